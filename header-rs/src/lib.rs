//! header-rs: email header authentication analyzer
//!
//! Reads an email header collection in whatever shape the caller has it
//! (raw text, a `{name: [values]}` mapping, or a list of `{key, value}`
//! entries) and reports whether SPF, DKIM and DMARC passed.
//!
//! # Example
//!
//! ```
//! use header_rs::analysis::HeaderAnalyzer;
//! use serde_json::json;
//!
//! let analyzer = HeaderAnalyzer::default();
//! let result = analyzer
//!     .analyze_value(json!({
//!         "Authentication-Results": ["mx.example.org; spf=pass; dmarc=pass"]
//!     }))
//!     .unwrap();
//!
//! assert!(result.spf);
//! assert!(result.dmarc);
//! assert!(!result.spoofed);
//! ```
//!
//! # Modules
//!
//! - [`analysis`]: Normalization and SPF/DKIM/DMARC flag detection
//! - [`mime`]: Raw header block parsing
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`logging`]: Tracing subscriber setup

pub mod analysis;
pub mod config;
pub mod error;
pub mod logging;
pub mod mime;

// Re-export commonly used types
pub use analysis::{AnalysisResult, HeaderAnalyzer, HeaderEntry, HeaderInput};
pub use config::Config;
pub use error::{HeaderError, Result};
