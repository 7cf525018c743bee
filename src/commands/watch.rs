/*!
 * `pulsar watch`: feed a JSON-lines log stream through the integrity manager
 *
 * One `LogEntry` JSON object per line. Blank lines are skipped; lines that
 * fail validation are logged and counted but never stop the stream.
 */

use crate::error::{PulsarError, Result};
use pulsar_sentinel::{IntegrityManager, MonitorStats, SentinelError};
use serde::Serialize;
use std::future::Future;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Outcome of one `watch` run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchSummary {
    /// Records accepted onto the queue
    pub submitted: u64,
    /// Records rejected at validation
    pub rejected: u64,
    /// `true` if the shutdown signal fired before end of input
    pub interrupted: bool,
    pub stats: MonitorStats,
}

/// Open `path` for line reading; `None` or `-` reads stdin
pub async fn open_input(path: Option<&Path>) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    match path {
        None => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
        Some(p) if p == Path::new("-") => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
        Some(p) => {
            let file = tokio::fs::File::open(p).await.map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => PulsarError::InputNotFound(p.to_path_buf()),
                _ => PulsarError::Io(e),
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Start the manager, submit every record from `input`, then shut down
///
/// End of input drains the queue before stopping. When `shutdown` resolves
/// first, the manager is stopped without draining and anything still queued
/// is abandoned.
pub async fn watch<R, S>(manager: &IntegrityManager, input: R, shutdown: S) -> Result<WatchSummary>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    manager.start()?;

    let fed = feed(manager, input, shutdown).await;
    let drained = match &fed {
        Ok(counts) if !counts.interrupted => manager.drain().await,
        _ => Ok(()),
    };

    // Stop on every path, then report the first failure
    let stopped = manager.stop().await;
    let counts = fed?;
    drained?;
    stopped?;

    let summary = WatchSummary {
        submitted: counts.submitted,
        rejected: counts.rejected,
        interrupted: counts.interrupted,
        stats: manager.stats(),
    };

    info!(
        submitted = summary.submitted,
        rejected = summary.rejected,
        interrupted = summary.interrupted,
        "Watch finished"
    );
    Ok(summary)
}

#[derive(Debug, Default)]
struct FeedCounts {
    submitted: u64,
    rejected: u64,
    interrupted: bool,
}

async fn feed<R, S>(manager: &IntegrityManager, input: R, shutdown: S) -> Result<FeedCounts>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let mut counts = FeedCounts::default();
    let mut lines = input.lines();
    let mut line_number = 0u64;
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("Shutdown requested; stopping watch");
                counts.interrupted = true;
                break;
            }

            line = lines.next_line() => match line? {
                Some(line) => line,
                None => {
                    debug!(lines = line_number, "End of input");
                    break;
                }
            },
        };
        line_number += 1;

        let record = line.trim();
        if record.is_empty() {
            continue;
        }

        match manager.submit_json(record) {
            Ok(()) => counts.submitted += 1,
            Err(SentinelError::Validation(e)) => {
                warn!(line = line_number, error = %e, "Skipping invalid log record");
                counts.rejected += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_core_verdict::HealingAction;
    use pulsar_sentinel::{IntegrityPolicy, ManagerState, TracingMedic};
    use std::io::Write;
    use std::sync::Arc;

    fn manager(policy: IntegrityPolicy) -> IntegrityManager {
        IntegrityManager::new(policy, Arc::new(TracingMedic::new())).unwrap()
    }

    const STREAM: &str = r#"{"timestamp":"2024-01-01T12:00:00","level":"INFO","source":"api","message":"ok"}
{"timestamp":"2024-01-01T12:00:01","level":"CRITICAL","source":"db","message":"Connection timeout to primary database."}

{"timestamp":"2024-01-01T12:00:02","level":"LOUD","source":"api","message":"bad level"}
not json at all
{"timestamp":"2024-01-01T12:00:03","level":"ERROR","source":"billing","message":"upstream failed"}
"#;

    #[tokio::test]
    async fn test_watch_end_of_input_drains() {
        crate::logging::init_test_logging();
        let manager = manager(IntegrityPolicy::with_allowed_actions([
            HealingAction::Alert,
            HealingAction::RestartService,
        ]));

        let summary = watch(&manager, STREAM.as_bytes(), std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.submitted, 3);
        assert_eq!(summary.rejected, 2);
        assert!(!summary.interrupted);
        assert_eq!(summary.stats.processed, 3);
        assert_eq!(summary.stats.escalated, 2);
        assert_eq!(summary.stats.restarts, 1);
        assert_eq!(summary.stats.alerts, 1);
        assert_eq!(manager.state(), ManagerState::Stopped);
    }

    #[tokio::test]
    async fn test_watch_default_policy_falls_back() {
        let manager = manager(IntegrityPolicy::default());

        let summary = watch(&manager, STREAM.as_bytes(), std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.stats.restarts, 0);
        assert_eq!(summary.stats.fallbacks, 1);
        assert_eq!(summary.stats.alerts, 2);
    }

    #[tokio::test]
    async fn test_watch_shutdown_before_input() {
        let manager = manager(IntegrityPolicy::default());

        let summary = watch(&manager, STREAM.as_bytes(), async {}).await.unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.submitted, 0);
        assert_eq!(manager.state(), ManagerState::Stopped);
    }

    #[tokio::test]
    async fn test_watch_read_error_still_stops_manager() {
        let manager = manager(IntegrityPolicy::default());
        let mut input = br#"{"level":"ERROR","source":"api","message":"failed"}"#.to_vec();
        input.extend_from_slice(b"\n\xff\xfe broken\n");

        let result = watch(&manager, &input[..], std::future::pending()).await;

        assert!(matches!(result, Err(PulsarError::Io(_))));
        assert_eq!(manager.state(), ManagerState::Stopped);
        assert_eq!(manager.backlog(), 0);
        assert!(manager.submit_json(r#"{"level":"INFO","source":"api","message":"late"}"#).is_err());
    }

    #[tokio::test]
    async fn test_open_input_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", STREAM).unwrap();

        let input = open_input(Some(file.path())).await.unwrap();
        let manager = manager(IntegrityPolicy::default());
        let summary = watch(&manager, input, std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.submitted, 3);
    }

    #[tokio::test]
    async fn test_open_input_missing() {
        let result = open_input(Some(Path::new("/nonexistent/events.jsonl"))).await;
        assert!(matches!(result, Err(PulsarError::InputNotFound(_))));
    }
}
