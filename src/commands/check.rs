/*!
 * `pulsar check`: manual integrity check
 */

use crate::error::{PulsarError, Result};
use pulsar_sentinel::{IntegrityManager, IntegrityReport, IntegrityStatus};

/// Run the manual check and return the report
///
/// A corrupted state is still a successful check; the caller decides how to
/// surface it. Use [`require_nominal`] to turn it into an error.
pub async fn check(manager: &IntegrityManager) -> IntegrityReport {
    manager.check_integrity().await
}

/// Map a corrupted report to [`PulsarError::IntegrityCorrupted`]
pub fn require_nominal(report: &IntegrityReport) -> Result<()> {
    match report.status {
        IntegrityStatus::Nominal => Ok(()),
        IntegrityStatus::Corrupted => Err(PulsarError::IntegrityCorrupted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_sentinel::{IntegrityPolicy, TracingMedic};
    use std::sync::Arc;

    fn report(status: IntegrityStatus) -> IntegrityReport {
        serde_json::from_value(serde_json::json!({
            "status": status,
            "checked_at": "2024-01-01T12:00:00Z",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_manager_is_nominal() {
        let manager =
            IntegrityManager::new(IntegrityPolicy::default(), Arc::new(TracingMedic::new()))
                .unwrap();

        let report = check(&manager).await;
        assert_eq!(report.status, IntegrityStatus::Nominal);
        assert!(require_nominal(&report).is_ok());
    }

    #[test]
    fn test_corrupted_report_is_integrity_error() {
        let result = require_nominal(&report(IntegrityStatus::Corrupted));
        assert!(matches!(result, Err(PulsarError::IntegrityCorrupted)));
        assert!(require_nominal(&report(IntegrityStatus::Nominal)).is_ok());
    }
}
