use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{HeaderError, Result};

/// One header field with a lower-cased key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub key: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: &str, value: impl Into<String>) -> Self {
        HeaderEntry {
            key: key.to_lowercase(),
            value: value.into(),
        }
    }
}

/// Authentication flags derived from a header collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Always true once analysis ran
    pub success: bool,
    pub spf: bool,
    pub dkim: bool,
    pub dmarc: bool,
    /// Never set: no From/Reply-To comparison rule exists yet
    pub spoofed: bool,
}

impl AnalysisResult {
    pub fn new() -> Self {
        AnalysisResult {
            success: true,
            spf: false,
            dkim: false,
            dmarc: false,
            spoofed: false,
        }
    }
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Accepted header collection shapes
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderInput {
    /// Raw header text, handed to the header parser
    Raw(String),
    /// `{name: value}` or `{name: [value, ...]}`, possibly wrapped in `header`
    Mapping(Map<String, Value>),
    /// `[{key|name, value}, ...]`
    Entries(Vec<Value>),
}

impl HeaderInput {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(raw) => Ok(HeaderInput::Raw(raw)),
            Value::Object(map) => Ok(HeaderInput::Mapping(map)),
            Value::Array(items) => Ok(HeaderInput::Entries(items)),
            other => Err(HeaderError::InvalidShape(format!(
                "expected text, object or array, got {}",
                other
            ))),
        }
    }

    /// JSON text is taken as structured input, anything else as raw headers
    pub fn from_text(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from_value(value),
            Err(_) => Ok(HeaderInput::Raw(text.to_string())),
        }
    }
}

impl From<Vec<HeaderEntry>> for HeaderInput {
    fn from(entries: Vec<HeaderEntry>) -> Self {
        HeaderInput::Entries(
            entries
                .into_iter()
                .map(|entry| {
                    let mut item = Map::new();
                    item.insert("key".to_string(), Value::String(entry.key));
                    item.insert("value".to_string(), Value::String(entry.value));
                    Value::Object(item)
                })
                .collect(),
        )
    }
}
