/*!
 * Error types for the Pulsar CLI
 */

use pulsar_sentinel::SentinelError;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, PulsarError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PARTIAL: i32 = 1;
pub const EXIT_FATAL: i32 = 2;
pub const EXIT_INTEGRITY: i32 = 3;

#[derive(Debug)]
pub enum PulsarError {
    /// CLI settings file could not be read or parsed
    Config(String),

    /// Input stream could not be opened
    InputNotFound(PathBuf),

    /// I/O error
    Io(io::Error),

    /// Rejected log record or CLI argument
    Validation(String),

    /// Integrity manager failure
    Sentinel(SentinelError),

    /// Manual integrity check found corrupted state
    IntegrityCorrupted,

    /// Generic error with message
    Other(String),
}

impl PulsarError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PulsarError::Config(_) | PulsarError::InputNotFound(_) | PulsarError::Validation(_) => {
                EXIT_FATAL
            }
            PulsarError::Sentinel(SentinelError::InvalidPolicy(_))
            | PulsarError::Sentinel(SentinelError::Config(_)) => EXIT_FATAL,
            PulsarError::IntegrityCorrupted => EXIT_INTEGRITY,
            PulsarError::Io(_) | PulsarError::Sentinel(_) | PulsarError::Other(_) => EXIT_PARTIAL,
        }
    }
}

impl fmt::Display for PulsarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PulsarError::Config(msg) => write!(f, "Configuration error: {}", msg),
            PulsarError::InputNotFound(path) => {
                write!(f, "Input not found: {}", path.display())
            }
            PulsarError::Io(err) => write!(f, "I/O error: {}", err),
            PulsarError::Validation(msg) => write!(f, "Invalid input: {}", msg),
            PulsarError::Sentinel(err) => write!(f, "Integrity manager error: {}", err),
            PulsarError::IntegrityCorrupted => write!(f, "Internal state corruption detected"),
            PulsarError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PulsarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PulsarError::Io(err) => Some(err),
            PulsarError::Sentinel(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for PulsarError {
    fn from(err: io::Error) -> Self {
        PulsarError::Io(err)
    }
}

impl From<SentinelError> for PulsarError {
    fn from(err: SentinelError) -> Self {
        PulsarError::Sentinel(err)
    }
}

impl From<pulsar_core_verdict::Error> for PulsarError {
    fn from(err: pulsar_core_verdict::Error) -> Self {
        PulsarError::Validation(err.to_string())
    }
}

impl From<serde_json::Error> for PulsarError {
    fn from(err: serde_json::Error) -> Self {
        PulsarError::Other(format!("JSON encode error: {}", err))
    }
}
