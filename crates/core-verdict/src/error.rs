//! Error types for log event validation

use thiserror::Error;

/// Result type for verdict operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the inbound boundary when a log event is malformed
#[derive(Error, Debug)]
pub enum Error {
    /// Level is not one of INFO, WARNING, ERROR, CRITICAL
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// Action name is not one of the known healing actions
    #[error("Invalid healing action: {0}")]
    InvalidAction(String),

    /// JSON record could not be decoded into a log entry
    #[error("Malformed log entry: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid level error
    pub fn invalid_level<S: Into<String>>(level: S) -> Self {
        Error::InvalidLevel(level.into())
    }

    /// Create an invalid action error
    pub fn invalid_action<S: Into<String>>(action: S) -> Self {
        Error::InvalidAction(action.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_error() {
        let err = Error::invalid_level("FATAL");
        assert!(matches!(err, Error::InvalidLevel(_)));
        assert!(err.to_string().contains("FATAL"));
    }

    #[test]
    fn test_invalid_action_error() {
        let err = Error::invalid_action("REBOOT_DATACENTER");
        assert!(matches!(err, Error::InvalidAction(_)));
        assert!(err.to_string().contains("REBOOT_DATACENTER"));
    }
}
