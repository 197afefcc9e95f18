/// Email header authentication analysis (SPF, DKIM, DMARC)
///
/// Normalizes any accepted header collection shape into an ordered list of
/// entries and derives pass/fail flags from them.

pub mod analyzer;
pub mod normalize;
pub mod types;

pub use analyzer::{analyze_entries, HeaderAnalyzer};
pub use normalize::normalize;
pub use types::{AnalysisResult, HeaderEntry, HeaderInput};
