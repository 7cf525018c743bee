//! Log event schema
//!
//! A [`LogEntry`] is one observed event pushed by a producer. Entries are
//! validated when they cross the inbound boundary: a level outside
//! INFO/WARNING/ERROR/CRITICAL is rejected before it can reach the queue.

use crate::error::{Error, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Severity level reported by the producer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Wire name of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// Strict parse of the exact wire name, as used for inbound records
    ///
    /// Unlike [`FromStr`], which is lenient for interactive use, this accepts
    /// only `INFO`, `WARNING`, `ERROR` and `CRITICAL`.
    pub fn from_wire(s: &str) -> Result<Self> {
        match s {
            "INFO" => Ok(LogLevel::Info),
            "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            _ => Err(Error::invalid_level(s)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive parse for command-line input
impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LogLevel::from_wire(&s.trim().to_ascii_uppercase()).map_err(|_| Error::invalid_level(s))
    }
}

/// One observed event
///
/// `timestamp` is caller-supplied ISO-8601 text and is not re-validated for
/// chronology. `context` is opaque to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLogEntry")]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub source: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, serde_json::Value>,
}

/// Unvalidated wire form; the level stays textual until checked
#[derive(Debug, Deserialize)]
struct RawLogEntry {
    #[serde(default)]
    timestamp: Option<String>,
    level: String,
    source: String,
    message: String,
    #[serde(default)]
    context: BTreeMap<String, serde_json::Value>,
}

impl TryFrom<RawLogEntry> for LogEntry {
    type Error = Error;

    fn try_from(raw: RawLogEntry) -> Result<Self> {
        let level = LogLevel::from_wire(&raw.level)?;
        Ok(Self {
            timestamp: raw.timestamp.unwrap_or_else(now_rfc3339),
            level,
            source: raw.source,
            message: raw.message,
            context: raw.context,
        })
    }
}

impl LogEntry {
    /// Create an entry stamped with the current UTC time
    pub fn new(level: LogLevel, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: now_rfc3339(),
            level,
            source: source.into(),
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    /// Override the timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Attach a diagnostic context value
    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// Decode and validate one JSON record
    ///
    /// A missing `timestamp` is filled with the current time. An unknown
    /// level yields [`Error::InvalidLevel`] rather than a decode error.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawLogEntry = serde_json::from_str(json)?;
        LogEntry::try_from(raw)
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_level_must_match_wire_name() {
        for level in ["critical", " ERROR ", "Warning", "info"] {
            let json = format!(
                r#"{{"level":"{}","source":"api","message":"ok"}}"#,
                level
            );
            let err = LogEntry::from_json(&json).unwrap_err();
            assert!(matches!(err, Error::InvalidLevel(_)), "{:?} accepted", level);

            let decoded: std::result::Result<LogEntry, _> = serde_json::from_str(&json);
            assert!(decoded.is_err(), "{:?} accepted by serde", level);
        }

        assert!(serde_json::from_str::<LogLevel>("\"critical\"").is_err());
        assert_eq!(LogLevel::from_wire("CRITICAL").unwrap(), LogLevel::Critical);
    }

    #[test]
    fn test_cli_level_parse_is_case_insensitive() {
        assert_eq!("critical".parse::<LogLevel>().unwrap(), LogLevel::Critical);
        assert_eq!("Warning".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!(" ERROR ".parse::<LogLevel>().unwrap(), LogLevel::Error);
    }

    #[test]
    fn test_level_parse_rejects_unknown() {
        let err = "INVALID_LEVEL".parse::<LogLevel>().unwrap_err();
        assert!(matches!(err, Error::InvalidLevel(_)));
    }

    #[test]
    fn test_from_json_valid() {
        let entry = LogEntry::from_json(
            r#"{"timestamp":"2024-01-01T12:00:00","level":"ERROR","source":"db","message":"boom","context":{"pid":42}}"#,
        )
        .unwrap();

        assert_eq!(entry.timestamp, "2024-01-01T12:00:00");
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.source, "db");
        assert_eq!(entry.context.get("pid"), Some(&serde_json::json!(42)));
    }

    #[test]
    fn test_from_json_rejects_invalid_level() {
        let err = LogEntry::from_json(
            r#"{"timestamp":"not-a-timestamp","level":"INVALID_LEVEL","source":"test","message":"test"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidLevel(_)));
    }

    #[test]
    fn test_from_json_rejects_missing_fields() {
        let err = LogEntry::from_json(r#"{"level":"INFO"}"#).unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn test_from_json_fills_missing_timestamp() {
        let entry =
            LogEntry::from_json(r#"{"level":"INFO","source":"api","message":"ok"}"#).unwrap();
        assert!(!entry.timestamp.is_empty());
        assert!(entry.context.is_empty());
    }

    #[test]
    fn test_serde_deserialize_validates_level() {
        let result: std::result::Result<LogEntry, _> = serde_json::from_str(
            r#"{"level":"LOUD","source":"api","message":"ok"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_builders() {
        let entry = LogEntry::new(LogLevel::Info, "cache", "warm")
            .with_timestamp("2024-06-01T00:00:00Z")
            .with_context("hits", serde_json::json!(10));

        assert_eq!(entry.timestamp, "2024-06-01T00:00:00Z");
        assert_eq!(entry.context.len(), 1);
    }
}
