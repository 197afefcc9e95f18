use crate::error::{HeaderError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Upper bound on raw header text handed to the parser
    #[serde(default = "default_max_header_bytes")]
    pub max_header_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_max_header_bytes() -> usize {
    1024 * 1024 // 1MB
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_header_bytes: default_max_header_bytes(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| HeaderError::Config(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| HeaderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(HeaderError::Config(format!(
                "Invalid listen address '{}'",
                self.server.listen_addr
            )));
        }

        if self.analysis.max_header_bytes == 0 {
            return Err(HeaderError::Config(
                "analysis.max_header_bytes must be positive".to_string(),
            ));
        }

        match self.logging.format.as_str() {
            "pretty" | "json" | "compact" => Ok(()),
            other => Err(HeaderError::Config(format!(
                "Unknown logging format '{}'",
                other
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                listen_addr: "0.0.0.0:8090".to_string(),
            },
            analysis: AnalysisConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
