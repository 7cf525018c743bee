//! Sentinel Metrics
//!
//! Counters for processed events and healing activity. The monitor task
//! writes through a shared [`StatsRecorder`]; callers read snapshots.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// Snapshot of monitor activity since the manager was built
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorStats {
    /// Log entries fully handled by the monitor loop
    pub processed: u64,

    /// Entries whose verdict crossed the escalation predicate
    pub escalated: u64,

    /// Incident records emitted
    pub incidents: u64,

    /// Restarts actually executed
    pub restarts: u64,

    /// Restarts suppressed by the cooldown
    pub rate_limited: u64,

    /// Alerts emitted, including rate-limit and fallback alerts
    pub alerts: u64,

    /// Disallowed actions downgraded to an alert
    pub fallbacks: u64,

    /// Allowed actions with no executor (NONE, ISOLATE_MODULE)
    pub unhandled_actions: u64,

    /// Executor calls that returned an error
    pub executor_failures: u64,

    /// Entries whose processing panicked
    pub panics: u64,
}

impl MonitorStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of processed entries that were escalated (0.0 - 1.0)
    pub fn escalation_ratio(&self) -> f64 {
        if self.processed == 0 {
            0.0
        } else {
            self.escalated as f64 / self.processed as f64
        }
    }

    /// Format a human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Monitor: {} processed | {} escalated ({:.1}%) | {} incidents | {} restarts | {} rate-limited | {} alerts | {} fallbacks | {} failures | {} panics",
            self.processed,
            self.escalated,
            self.escalation_ratio() * 100.0,
            self.incidents,
            self.restarts,
            self.rate_limited,
            self.alerts,
            self.fallbacks,
            self.executor_failures,
            self.panics
        )
    }
}

/// Shared, lock-protected stats accumulator
///
/// A panic inside the monitor loop must not make the counters unreadable,
/// so a poisoned lock is recovered rather than propagated.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    stats: Mutex<MonitorStats>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an update to the counters
    pub fn record(&self, update: impl FnOnce(&mut MonitorStats)) {
        update(&mut self.lock());
    }

    /// Copy of the current counters
    pub fn snapshot(&self) -> MonitorStats {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, MonitorStats> {
        self.stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
