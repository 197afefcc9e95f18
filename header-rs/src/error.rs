use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Header entry {index} is missing field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Header '{0}' has an empty value list")]
    EmptyValue(String),

    #[error("Header '{0}' has a non-text value")]
    InvalidValue(String),

    #[error("Unsupported header collection shape: {0}")]
    InvalidShape(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HeaderError>;
