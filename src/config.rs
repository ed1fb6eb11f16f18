//! Ledger configuration
//!
//! Loaded from a JSON file. Every field is optional:
//!
//! ```json
//! {
//!   "store_path": "./resolution.slr",
//!   "max_descriptions_per_reason": 64,
//!   "max_text_bytes": 65536,
//!   "log_level": "info"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::CodecLimits;
use crate::observability::{log_event_with_fields, Event, Logger, Severity};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "LEDGER_CONFIG_READ",
            ConfigError::Parse(_) => "LEDGER_CONFIG_PARSE",
            ConfigError::Invalid(_) => "LEDGER_CONFIG_INVALID",
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Resolution result file
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Decode limit on descriptions per reason
    #[serde(default = "default_max_descriptions")]
    pub max_descriptions_per_reason: usize,

    /// Decode limit on a single description text, in bytes
    #[serde(default = "default_max_text_bytes")]
    pub max_text_bytes: usize,

    /// Minimum log severity: trace, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./resolution.slr")
}
fn default_max_descriptions() -> usize {
    CodecLimits::default().max_descriptions_per_reason
}
fn default_max_text_bytes() -> usize {
    CodecLimits::default().max_text_bytes
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            max_descriptions_per_reason: default_max_descriptions(),
            max_text_bytes: default_max_text_bytes(),
            log_level: default_log_level(),
        }
    }
}

impl LedgerConfig {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content)?;

        let path_field = path.display().to_string();
        let store_field = config.store_path.display().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", path_field.as_str()), ("store_path", store_field.as_str())],
        );
        Ok(config)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: LedgerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_descriptions_per_reason == 0 {
            return Err(ConfigError::Invalid(
                "max_descriptions_per_reason must be > 0".to_string(),
            ));
        }
        if self.max_text_bytes == 0 {
            return Err(ConfigError::Invalid("max_text_bytes must be > 0".to_string()));
        }
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store_path must not be empty".to_string()));
        }
        self.severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse::<Severity>().map_err(ConfigError::Invalid)
    }

    /// Install `log_level` as the process-wide minimum severity
    pub fn apply_logging(&self) -> ConfigResult<()> {
        Logger::set_min_severity(self.severity()?);
        Ok(())
    }

    /// Decode limits for codecs built from this configuration
    pub fn codec_limits(&self) -> CodecLimits {
        CodecLimits {
            max_descriptions_per_reason: self.max_descriptions_per_reason,
            max_text_bytes: self.max_text_bytes,
        }
    }
}
