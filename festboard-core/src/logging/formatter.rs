//! Log formatting options for different output styles

use crate::logging::destinations::LogEntry;
use std::str::FromStr;

/// How logs should be formatted
#[derive(Clone, Debug, PartialEq)]
pub enum LogFormat {
    /// Structured JSON, one object per line
    /// Example: {"timestamp":"2024-01-15T10:30:00Z","level":"INFO","target":"festboard_core::auth","message":"Signed in"}
    Json,

    /// Human-readable format (development default)
    /// Example: 2024-01-15 10:30:00.000 INFO  [festboard_core::auth] Signed in
    Human,

    /// Logfmt format (key=value pairs)
    /// Example: timestamp=2024-01-15T10:30:00Z level=INFO target=festboard_core::auth message="Signed in"
    Logfmt,
}

impl LogFormat {
    /// Format a log entry according to this format
    pub fn format_entry(&self, entry: &LogEntry) -> String {
        match self {
            LogFormat::Json => format_json(entry),
            LogFormat::Human => format_human(entry),
            LogFormat::Logfmt => format_logfmt(entry),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "human" | "text" => Ok(LogFormat::Human),
            "logfmt" => Ok(LogFormat::Logfmt),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

fn level_name(entry: &LogEntry) -> String {
    format!("{:?}", entry.level).to_uppercase()
}

fn format_json(entry: &LogEntry) -> String {
    let mut json = serde_json::Map::new();
    json.insert("timestamp".into(), entry.timestamp.to_rfc3339().into());
    json.insert("level".into(), level_name(entry).into());
    json.insert("target".into(), entry.target.clone().into());
    json.insert("message".into(), entry.message.clone().into());

    for (key, value) in &entry.fields {
        json.insert(key.clone(), value.clone().into());
    }

    serde_json::to_string(&json).unwrap_or_else(|_| "Failed to serialize log entry".to_string())
}

fn format_human(entry: &LogEntry) -> String {
    let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
    let mut message =
        format!("{} {:5} [{}] {}", timestamp, level_name(entry), entry.target, entry.message);

    for (key, value) in &entry.fields {
        message.push_str(&format!(" {}={}", key, value));
    }

    message
}

fn format_logfmt(entry: &LogEntry) -> String {
    let quote = |s: &str| format!("\"{}\"", s.replace('"', "\\\""));

    let mut parts = vec![
        format!("timestamp={}", entry.timestamp.to_rfc3339()),
        format!("level={}", level_name(entry)),
        format!("target={}", entry.target),
        format!("message={}", quote(&entry.message)),
    ];

    for (key, value) in &entry.fields {
        parts.push(format!("{}={}", key, quote(value)));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;

    #[test]
    fn test_json_format() {
        let entry = LogEntry::new(LogLevel::Info, "Signed in", "festboard_core::auth")
            .with_field("role", "judge");

        let formatted = LogFormat::Json.format_entry(&entry);

        let parsed: serde_json::Value = serde_json::from_str(&formatted).unwrap();
        assert_eq!(parsed["message"], "Signed in");
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["target"], "festboard_core::auth");
        assert_eq!(parsed["role"], "judge");
    }

    #[test]
    fn test_human_format() {
        let entry = LogEntry::new(LogLevel::Error, "Identity check failed", "app::auth")
            .with_field("service", "festboard");

        let formatted = LogFormat::Human.format_entry(&entry);

        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("[app::auth] Identity check failed"));
        assert!(formatted.ends_with("service=festboard"));
    }

    #[test]
    fn test_logfmt_escapes_quotes() {
        let entry = LogEntry::new(LogLevel::Warn, "bad \"token\"", "app::http");

        let formatted = LogFormat::Logfmt.format_entry(&entry);

        assert!(formatted.contains("level=WARN"));
        assert!(formatted.contains("message=\"bad \\\"token\\\"\""));
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Human));
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
