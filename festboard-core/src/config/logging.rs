//! Logging configuration

use crate::logging::{LogFormat, LogLevel};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Env: FESTBOARD_LOG_LEVEL
    pub level: String,
    /// "human", "json" or "logfmt"
    /// Env: FESTBOARD_LOG_FORMAT
    pub format: String,
    /// Write to stderr instead of stdout
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "human".to_string(), stderr: true }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(level) = env::var("FESTBOARD_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = env::var("FESTBOARD_LOG_FORMAT") {
            self.format = format;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.level.parse::<LogLevel>().is_err() {
            bail!("Invalid logging.level: {}", self.level);
        }
        if self.format.parse::<LogFormat>().is_err() {
            bail!("Invalid logging.format: {}", self.format);
        }
        Ok(())
    }

    /// Runtime logger settings for [`crate::logging::init_logging`]
    pub fn to_runtime(&self) -> crate::logging::LoggingConfig {
        let level = self.level.parse().unwrap_or(LogLevel::Info);
        let format = self.format.parse().unwrap_or(LogFormat::Human);

        let config = crate::logging::LoggingConfig::default().with_level(level);
        if self.stderr {
            config.with_stderr(format)
        } else {
            config.with_stdout(format)
        }
    }
}
