//! Integrity Manager: the monitor loop
//!
//! # Architecture
//!
//! ```text
//! Producer 1 ──┐
//!              ├──► submit() ──► log queue ──► monitor task ──► analyze ──► ActionGate ──► Medic
//! Producer 2 ──┤   (never blocks)  (FIFO)      (single consumer)
//! Producer 3 ──┘
//! ```
//!
//! # Lifecycle
//!
//! ```text
//! Initialized ──start()──► Running ──stop()──► Draining ──► Stopped
//!      │                                                      ▲
//!      └──────────────────────stop()──────────────────────────┘
//! ```
//!
//! `stop()` is cooperative: an entry that has already been dequeued is
//! finished, then the loop exits without dequeuing anything else. Call
//! `drain()` first to know the backlog has been handled.
//!
//! # Example
//!
//! ```no_run
//! use pulsar_sentinel::{IntegrityManager, IntegrityPolicy, TracingMedic};
//! use pulsar_core_verdict::{LogEntry, LogLevel};
//! use std::sync::Arc;
//!
//! # async fn example() -> pulsar_sentinel::Result<()> {
//! let manager = IntegrityManager::new(IntegrityPolicy::default(), Arc::new(TracingMedic::new()))?;
//! manager.start()?;
//!
//! manager.submit(LogEntry::new(LogLevel::Error, "billing", "Upstream timeout"))?;
//!
//! manager.drain().await?;
//! manager.stop().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, SentinelError};
use crate::gate::{ActionGate, GateOutcome};
use crate::integrity::{IntegrityMarker, IntegrityReport, IntegrityStatus};
use crate::medic::Medic;
use crate::metrics::{MonitorStats, StatsRecorder};
use crate::policy::IntegrityPolicy;
use chrono::Utc;
use futures::FutureExt;
use pulsar_core_verdict::{analyze, LogEntry};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

/// Lifecycle state of an integrity manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagerState {
    /// Configured, queue open, monitor not yet started
    Initialized,
    /// Monitor task is consuming the queue
    Running,
    /// Shutdown requested; finishing the current entry
    Draining,
    /// Monitor has exited; terminal
    Stopped,
}

impl fmt::Display for ManagerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ManagerState::Initialized => "initialized",
            ManagerState::Running => "running",
            ManagerState::Draining => "draining",
            ManagerState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Owns the log queue, the policy and the monitor task
pub struct IntegrityManager {
    policy: Arc<IntegrityPolicy>,
    medic: Arc<dyn Medic>,
    queue_tx: mpsc::UnboundedSender<LogEntry>,
    /// Present until `start()` hands it to the monitor task
    queue_rx: Mutex<Option<mpsc::UnboundedReceiver<LogEntry>>>,
    /// Entries submitted but not yet fully processed
    backlog: Arc<watch::Sender<usize>>,
    state: Arc<watch::Sender<ManagerState>>,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    monitor: Mutex<Option<JoinHandle<()>>>,
    stats: Arc<StatsRecorder>,
    marker: IntegrityMarker,
}

impl IntegrityManager {
    /// Create a manager with an explicit policy and executor set
    ///
    /// Fails only if the policy does not validate.
    pub fn new(policy: IntegrityPolicy, medic: Arc<dyn Medic>) -> Result<Self> {
        policy.validate().map_err(SentinelError::InvalidPolicy)?;

        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let (backlog, _) = watch::channel(0usize);
        let (state, _) = watch::channel(ManagerState::Initialized);

        debug!(
            severity_threshold = policy.severity_threshold(),
            allowed_actions = ?policy.allowed_actions,
            restart_cooldown_s = policy.restart_cooldown_secs,
            "Integrity manager initialized"
        );

        Ok(Self {
            policy: Arc::new(policy),
            medic,
            queue_tx,
            queue_rx: Mutex::new(Some(queue_rx)),
            backlog: Arc::new(backlog),
            state: Arc::new(state),
            shutdown_tx: Mutex::new(None),
            monitor: Mutex::new(None),
            stats: Arc::new(StatsRecorder::new()),
            marker: IntegrityMarker::new(),
        })
    }

    /// Create a manager from a configuration document
    ///
    /// A missing or broken document falls back to defaults; see
    /// [`IntegrityPolicy::load`].
    pub fn from_config(path: impl AsRef<Path>, medic: Arc<dyn Medic>) -> Result<Self> {
        Self::new(IntegrityPolicy::load(path), medic)
    }

    /// Spawn the monitor task
    ///
    /// Fails with [`SentinelError::NoRuntime`] outside a tokio runtime. A
    /// manager can be started once; a stopped manager cannot be restarted.
    pub fn start(&self) -> Result<()> {
        // Before the queue is taken: the manager stays Initialized on failure
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SentinelError::NoRuntime(e.to_string()))?;

        let mut queue_slot = lock(&self.queue_rx);
        let queue_rx = match queue_slot.take() {
            Some(rx) => rx,
            None => {
                return Err(SentinelError::InvalidState {
                    operation: "start",
                    state: self.state(),
                })
            }
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        *lock(&self.shutdown_tx) = Some(shutdown_tx);

        let gate = ActionGate::new(self.policy.clone(), self.medic.clone(), self.stats.clone());
        self.state.send_replace(ManagerState::Running);

        info!(
            "🛡️  Integrity monitor active | Severity threshold: {} | Allowed actions: {:?} | Restart cooldown: {}s",
            self.policy.severity_threshold(),
            self.policy.allowed_actions,
            self.policy.restart_cooldown_secs
        );

        let handle = runtime.spawn(run_monitor_loop(
            queue_rx,
            shutdown_rx,
            gate,
            self.backlog.clone(),
            self.state.clone(),
            self.stats.clone(),
        ));
        *lock(&self.monitor) = Some(handle);

        Ok(())
    }

    /// Request cooperative shutdown and wait for the monitor to exit
    ///
    /// Entries still queued are abandoned. Stopping an already stopped
    /// manager is a no-op.
    pub async fn stop(&self) -> Result<()> {
        {
            let mut queue_slot = lock(&self.queue_rx);
            if let Some(mut queue_rx) = queue_slot.take() {
                // Never started: nothing to wait for
                queue_rx.close();
                let abandoned = discard_pending(&mut queue_rx);
                self.backlog.send_replace(0);
                self.state.send_replace(ManagerState::Stopped);
                info!(abandoned, "Integrity manager stopped before start");
                return Ok(());
            }
        }

        self.state.send_if_modified(|state| {
            if *state == ManagerState::Running {
                *state = ManagerState::Draining;
                true
            } else {
                false
            }
        });

        if let Some(tx) = lock(&self.shutdown_tx).take() {
            let _ = tx.send(());
            info!("Integrity monitor shutdown signal sent");
        }

        let handle = lock(&self.monitor).take();
        match handle {
            Some(handle) => {
                if let Err(e) = handle.await {
                    error!(error = %e, "💥 Monitor task terminated abnormally");
                    self.backlog.send_replace(0);
                    self.state.send_replace(ManagerState::Stopped);
                    return Err(SentinelError::MonitorFailed(e.to_string()));
                }
            }
            None => {
                // Another caller owns the handle; wait for it to finish
                let mut state = self.state.subscribe();
                let _ = state.wait_for(|s| *s == ManagerState::Stopped).await;
            }
        }

        Ok(())
    }

    /// Enqueue one validated log entry
    ///
    /// Never blocks. Fails with [`SentinelError::Stopped`] once shutdown has
    /// been requested.
    pub fn submit(&self, entry: LogEntry) -> Result<()> {
        let state = self.state();
        if matches!(state, ManagerState::Draining | ManagerState::Stopped) {
            return Err(SentinelError::Stopped);
        }

        self.backlog.send_modify(|n| *n += 1);
        if self.queue_tx.send(entry).is_err() {
            self.backlog.send_modify(|n| *n = n.saturating_sub(1));
            return Err(SentinelError::Stopped);
        }

        Ok(())
    }

    /// Validate a JSON record and enqueue it
    ///
    /// Malformed records are rejected here and never reach the queue.
    pub fn submit_json(&self, json: &str) -> Result<()> {
        let entry = LogEntry::from_json(json)?;
        self.submit(entry)
    }

    /// Wait until every entry submitted so far has been fully processed
    ///
    /// Returns immediately when the backlog is empty. Waiting on a manager
    /// that was never started would block forever, so that case is an error.
    pub async fn drain(&self) -> Result<()> {
        let mut backlog = self.backlog.subscribe();
        if *backlog.borrow_and_update() == 0 {
            return Ok(());
        }

        let state = self.state();
        if state == ManagerState::Initialized {
            return Err(SentinelError::InvalidState {
                operation: "drain",
                state,
            });
        }

        backlog
            .wait_for(|n| *n == 0)
            .await
            .map_err(|_| SentinelError::Stopped)?;
        Ok(())
    }

    /// Manual check of the internal critical state
    ///
    /// Independent of the queue and the cooldown state; safe to call while
    /// the monitor is running. Raises one alert when corruption is found.
    pub async fn verify_system_state(&self) -> IntegrityStatus {
        info!("🔍 Performing manual integrity check...");

        let status = self.marker.status();
        match status {
            IntegrityStatus::Nominal => info!("💚 System status: nominal"),
            IntegrityStatus::Corrupted => {
                error!("🚨 Issues detected: internal state has been corrupted");
                match self.medic.alert("Internal state corruption detected!").await {
                    Ok(()) => self.stats.record(|s| s.alerts += 1),
                    Err(e) => {
                        error!(executor = "alert", error = %e, "❌ Healing executor failed");
                        self.stats.record(|s| s.executor_failures += 1);
                    }
                }
            }
        }

        status
    }

    /// Run the manual check and wrap the result in a report
    pub async fn check_integrity(&self) -> IntegrityReport {
        IntegrityReport {
            status: self.verify_system_state().await,
            checked_at: Utc::now(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ManagerState {
        *self.state.borrow()
    }

    /// Entries submitted but not yet fully processed
    pub fn backlog(&self) -> usize {
        *self.backlog.borrow()
    }

    /// Snapshot of the monitor counters
    pub fn stats(&self) -> MonitorStats {
        self.stats.snapshot()
    }

    /// The policy in force
    pub fn policy(&self) -> &IntegrityPolicy {
        &self.policy
    }

    /// Overwrite the internal critical state so the next check reports it
    #[doc(hidden)]
    pub fn inject_state_corruption(&self, value: &str) {
        warn!("Injecting internal state corruption");
        self.marker.overwrite(value);
    }
}

/// Marks the manager stopped however the monitor task ends
struct MonitorExit {
    backlog: Arc<watch::Sender<usize>>,
    state: Arc<watch::Sender<ManagerState>>,
}

impl Drop for MonitorExit {
    fn drop(&mut self) {
        if std::thread::panicking() {
            error!("💥 Monitor loop panicked outside the per-entry guard; monitoring has stopped");
        }
        // Abandoned entries will never be processed; release any drain() waiters
        self.backlog.send_replace(0);
        self.state.send_replace(ManagerState::Stopped);
    }
}

/// The monitor: dequeue, classify, gate, repeat
async fn run_monitor_loop(
    mut queue_rx: mpsc::UnboundedReceiver<LogEntry>,
    mut shutdown_rx: oneshot::Receiver<()>,
    mut gate: ActionGate,
    backlog: Arc<watch::Sender<usize>>,
    state: Arc<watch::Sender<ManagerState>>,
    stats: Arc<StatsRecorder>,
) {
    let _exit = MonitorExit {
        backlog: backlog.clone(),
        state,
    };

    loop {
        let entry = tokio::select! {
            biased;

            // Shutdown wins over pending entries: no new dequeues once requested
            _ = &mut shutdown_rx => {
                info!("Integrity monitor shutdown signal received");
                break;
            }

            next = queue_rx.recv() => match next {
                Some(entry) => entry,
                None => {
                    debug!("Log queue closed");
                    break;
                }
            },
        };

        process_entry(&mut gate, &stats, entry).await;
        backlog.send_modify(|n| *n = n.saturating_sub(1));
    }

    queue_rx.close();
    let abandoned = discard_pending(&mut queue_rx);
    if abandoned > 0 {
        warn!(abandoned, "⚠️  Integrity monitor stopped with unprocessed log entries");
    }

    info!("Integrity monitor stopped");
}

/// Classify and gate one entry, containing any panic to this entry
async fn process_entry(gate: &mut ActionGate, stats: &StatsRecorder, entry: LogEntry) {
    let result = AssertUnwindSafe(async {
        let verdict = analyze(&entry);
        trace!(
            source = %entry.source,
            severity = verdict.severity,
            anomaly = verdict.is_anomaly,
            "Log entry classified"
        );
        gate.evaluate(&entry, &verdict).await
    })
    .catch_unwind()
    .await;

    match result {
        Ok(GateOutcome::Ignored) => {}
        Ok(outcome) => debug!(source = %entry.source, ?outcome, "Verdict handled"),
        Err(payload) => {
            error!(
                source = %entry.source,
                panic = %panic_message(payload.as_ref()),
                "💥 Panic while processing log entry; continuing"
            );
            stats.record(|s| s.panics += 1);
        }
    }

    stats.record(|s| s.processed += 1);
}

fn discard_pending(queue_rx: &mut mpsc::UnboundedReceiver<LogEntry>) -> usize {
    let mut discarded = 0;
    while queue_rx.try_recv().is_ok() {
        discarded += 1;
    }
    discarded
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
