//! Error types for the integrity sentinel

use crate::daemon::ManagerState;
use thiserror::Error;

/// Result type for sentinel operations
pub type Result<T> = std::result::Result<T, SentinelError>;

/// Errors surfaced to callers of the integrity manager
#[derive(Error, Debug)]
pub enum SentinelError {
    /// Inbound log entry failed validation and was not queued
    #[error("Invalid log entry: {0}")]
    Validation(#[from] pulsar_core_verdict::Error),

    /// The monitor loop has stopped; no further entries are accepted
    #[error("Integrity manager has stopped")]
    Stopped,

    /// Lifecycle operation not valid in the current state
    #[error("Cannot {operation} while manager is {state}")]
    InvalidState {
        operation: &'static str,
        state: ManagerState,
    },

    /// `start()` was called outside a tokio runtime
    #[error("Integrity manager must be started inside a tokio runtime: {0}")]
    NoRuntime(String),

    /// Policy values out of range
    #[error("Invalid integrity policy: {0}")]
    InvalidPolicy(String),

    /// Configuration document could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The monitor loop died outside the per-item guard
    #[error("Monitor loop terminated abnormally: {0}")]
    MonitorFailed(String),
}

/// Failure of a single healing executor
///
/// Executors are best-effort. These errors are logged and counted by the
/// action gate and never reach the producer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HealError {
    #[error("Alert delivery failed: {0}")]
    Alert(String),

    #[error("Restart of '{target}' failed: {reason}")]
    Restart { target: String, reason: String },

    #[error("Incident record failed: {0}")]
    Incident(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_message() {
        let err = SentinelError::InvalidState {
            operation: "start",
            state: ManagerState::Stopped,
        };
        assert_eq!(err.to_string(), "Cannot start while manager is stopped");
    }

    #[test]
    fn test_validation_from_verdict_error() {
        let err: SentinelError = pulsar_core_verdict::Error::invalid_level("LOUD").into();
        assert!(matches!(err, SentinelError::Validation(_)));
        assert!(err.to_string().contains("LOUD"));
    }

    #[test]
    fn test_restart_error_message() {
        let err = HealError::Restart {
            target: "db".to_string(),
            reason: "supervisor unreachable".to_string(),
        };
        assert!(err.to_string().contains("'db'"));
        assert!(err.to_string().contains("supervisor unreachable"));
    }
}
