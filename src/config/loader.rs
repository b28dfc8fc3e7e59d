//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{LoggerConfig, ServerConfig};
use crate::observability::severity::UnknownSeverity;

pub const ENV_DEBUG: &str = "DEBUG";
pub const ENV_LOGENTRIES_TOKEN: &str = "LOGENTRIES_TOKEN";
pub const ENV_LOG_LEVEL: &str = "LOGLVL";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid LOGLVL: {0}")]
    InvalidLevel(#[from] UnknownSeverity),
}

/// Load a TOML file, then apply the environment on top.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: ServerConfig = toml::from_str(&content)?;
    config.logging.apply_vars(|key| std::env::var(key).ok())?;
    Ok(config)
}

impl LoggerConfig {
    /// Logger settings from `DEBUG`, `LOGENTRIES_TOKEN` and `LOGLVL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`LoggerConfig::from_env`] with an explicit variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_vars(lookup)?;
        Ok(config)
    }

    /// Override fields with whichever variables are set.
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(debug) = lookup(ENV_DEBUG) {
            self.debug = debug == "TRUE";
        }
        if let Some(token) = lookup(ENV_LOGENTRIES_TOKEN).filter(|t| !t.is_empty()) {
            self.logentries_token = Some(token);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logentries_level = level.parse()?;
        }
        Ok(())
    }
}
