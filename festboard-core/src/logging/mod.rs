//! Festboard logging
//!
//! A small `log::Log` backend: configure once at startup, then use the standard
//! `log::info!`/`log::warn!` macros everywhere.
//!
//! # Example
//!
//! ```rust,no_run
//! use festboard_core::logging::{LoggingConfig, LogFormat};
//!
//! let config = LoggingConfig::default()
//!     .with_stderr(LogFormat::Human)
//!     .with_context_field("service", "festboard");
//!
//! festboard_core::logging::init_logging(&config).unwrap();
//! log::info!("Dashboard starting");
//! ```

pub mod config;
pub mod destinations;
pub mod formatter;

pub use config::{LogLevel, LoggingConfig};
pub use destinations::{LogEntry, LogOutput};
pub use formatter::LogFormat;

use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Install the Festboard logger as the global `log` backend
///
/// Safe to call multiple times; only the first call has any effect.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = init_logging_internal(config);
    });
    result
}

fn init_logging_internal(config: &LoggingConfig) -> anyhow::Result<()> {
    let logger = FestboardLogger::new(config.clone());
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(config.level.into());
    Ok(())
}

enum Stream {
    Stdout,
    Stderr,
}

struct Writer {
    stream: Stream,
    format: LogFormat,
}

impl Writer {
    fn write(&self, entry: &LogEntry) {
        let line = self.format.format_entry(entry);
        let _ = match self.stream {
            Stream::Stdout => writeln!(std::io::stdout().lock(), "{}", line),
            Stream::Stderr => writeln!(std::io::stderr().lock(), "{}", line),
        };
    }

    fn flush(&self) {
        let _ = match self.stream {
            Stream::Stdout => std::io::stdout().flush(),
            Stream::Stderr => std::io::stderr().flush(),
        };
    }
}

struct FestboardLogger {
    config: LoggingConfig,
    writers: Vec<Writer>,
}

impl FestboardLogger {
    fn new(config: LoggingConfig) -> Self {
        let mut writers: Vec<Writer> = config
            .outputs
            .iter()
            .map(|output| match output {
                LogOutput::Stdout { format } => Writer {
                    stream: Stream::Stdout,
                    format: format.clone().unwrap_or_else(|| config.format.clone()),
                },
                LogOutput::Stderr { format } => Writer {
                    stream: Stream::Stderr,
                    format: format.clone().unwrap_or_else(|| config.format.clone()),
                },
            })
            .collect();

        // Default to stderr if no outputs specified
        if writers.is_empty() {
            writers.push(Writer { stream: Stream::Stderr, format: config.format.clone() });
        }

        Self { config, writers }
    }
}

impl log::Log for FestboardLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        LogLevel::from(metadata.level()) <= self.config.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = LogEntry::from_log_record(record, &self.config);
        for writer in &self.writers {
            writer.write(&entry);
        }
    }

    fn flush(&self) {
        for writer in &self.writers {
            writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_level_filtering() {
        let logger = FestboardLogger::new(LoggingConfig::default().with_level(LogLevel::Warn));

        let warn = log::Metadata::builder().level(log::Level::Warn).target("t").build();
        let info = log::Metadata::builder().level(log::Level::Info).target("t").build();

        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&info));
    }

    #[test]
    fn test_default_output_is_stderr() {
        let logger = FestboardLogger::new(LoggingConfig::default());
        assert_eq!(logger.writers.len(), 1);
        assert!(matches!(logger.writers[0].stream, Stream::Stderr));
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = LoggingConfig::default().with_level(LogLevel::Error);
        assert!(init_logging(&config).is_ok());
        assert!(init_logging(&config).is_ok());
    }
}
