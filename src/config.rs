/*!
 * CLI configuration
 *
 * Settings for the `pulsar` binary itself. The integrity policy lives in its
 * own document, loaded by the sentinel crate.
 */

use crate::error::{PulsarError, Result};
use pulsar_sentinel::DEFAULT_CONFIG_PATH;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one `pulsar` invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stderr)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,

    /// Integrity policy document
    #[serde(default = "default_policy_path")]
    pub policy_path: PathBuf,

    /// Simulated duration of a restart in milliseconds
    #[serde(default)]
    pub restart_settle_ms: u64,
}

fn default_policy_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_file: None,
            verbose: false,
            policy_path: default_policy_path(),
            restart_settle_ms: 0,
        }
    }
}

impl CliConfig {
    /// Load CLI settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PulsarError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents)
            .map_err(|e| PulsarError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
