//! Log outputs and the structured entry they receive

use crate::logging::{LogFormat, LogLevel, LoggingConfig};
use std::collections::BTreeMap;

/// Where logs should be sent
#[derive(Clone, Debug, PartialEq)]
pub enum LogOutput {
    /// Write to stdout
    Stdout {
        /// Override the default format for this output
        format: Option<LogFormat>,
    },
    /// Write to stderr
    Stderr {
        /// Override the default format for this output
        format: Option<LogFormat>,
    },
}

/// A structured log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Usually the module path
    pub target: String,
    /// Context fields, sorted so output is stable
    pub fields: BTreeMap<String, String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            level,
            message: message.into(),
            target: target.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Create a LogEntry from a standard log::Record
    pub fn from_log_record(record: &log::Record, config: &LoggingConfig) -> Self {
        let mut entry =
            Self::new(record.level().into(), record.args().to_string(), record.target());
        for (key, value) in &config.context_fields {
            entry.fields.insert(key.clone(), value.clone());
        }
        entry
    }

    pub fn with_field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}
