/// Raw header block parsing
///
/// Turns raw header text into the nested `{header: {header: {...}}}`
/// structure consumed by the analyzer.

pub mod parser;
pub mod types;

pub use parser::HeaderParser;
pub use types::{HeaderBlock, HeaderFields, ParsedHeaders};
