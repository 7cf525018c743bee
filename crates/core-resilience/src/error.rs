//! Error types for resilience primitives

use std::time::Duration;
use thiserror::Error;

/// Errors produced by resilience primitives
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResilienceError {
    /// The key acted too recently and is still inside its cooldown window
    #[error("Cooldown active for '{key}': {}s remaining", remaining.as_secs())]
    CoolingDown { key: String, remaining: Duration },
}

impl ResilienceError {
    /// Remaining cooldown, if this is a cooldown rejection
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            ResilienceError::CoolingDown { remaining, .. } => Some(*remaining),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooling_down_message() {
        let err = ResilienceError::CoolingDown {
            key: "db".to_string(),
            remaining: Duration::from_secs(120),
        };
        let msg = err.to_string();
        assert!(msg.contains("db"));
        assert!(msg.contains("120s"));
        assert_eq!(err.remaining(), Some(Duration::from_secs(120)));
    }
}
