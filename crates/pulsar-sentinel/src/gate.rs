//! Action Gate: policy enforcement between the classifier and the Medic
//!
//! ```text
//! Verdict ──► escalates? ──no──► Ignored
//!                │yes
//!                ▼
//!         log_incident (always)
//!                │
//!                ▼
//!         allowed? ──no──► alert "not permitted, falling back to ALERT"
//!                │yes
//!      ┌─────────┼──────────────┐
//!      ▼         ▼              ▼
//!   RESTART    ALERT     NONE / ISOLATE_MODULE
//!      │         │              │
//!  cooldown?   alert       no executor (logged)
//!   ok │ hot
//!      ▼   └──► alert "rate limited"
//!   restart
//! ```
//!
//! The gate owns the restart cooldown state. It is moved into the single
//! monitor task, so the cooldown map is never shared and needs no lock.

use crate::error::HealError;
use crate::medic::Medic;
use crate::metrics::StatsRecorder;
use crate::policy::IntegrityPolicy;
use pulsar_core_resilience::{CooldownTracker, ResilienceError};
use pulsar_core_verdict::{HealingAction, LogEntry, Verdict};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What the gate did with one verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Below threshold and not anomalous; no side effects
    Ignored,
    /// Restart attempted for the target; executor failures are counted in the stats
    Restarted { target: String },
    /// Restart suppressed by the cooldown; a warning alert was raised
    RateLimited { target: String, remaining: Duration },
    /// Anomaly alert raised
    Alerted,
    /// Recommended action not allowed; alert raised instead
    Fallback { requested: HealingAction },
    /// Allowed action with no executor
    NoExecutor { action: HealingAction },
}

/// Applies the integrity policy to verdicts and dispatches executors
pub struct ActionGate {
    policy: Arc<IntegrityPolicy>,
    medic: Arc<dyn Medic>,
    cooldown: CooldownTracker,
    stats: Arc<StatsRecorder>,
}

impl ActionGate {
    pub fn new(
        policy: Arc<IntegrityPolicy>,
        medic: Arc<dyn Medic>,
        stats: Arc<StatsRecorder>,
    ) -> Self {
        let cooldown = CooldownTracker::new(policy.restart_cooldown());
        Self {
            policy,
            medic,
            cooldown,
            stats,
        }
    }

    /// Apply the policy to one verdict
    pub async fn evaluate(&mut self, entry: &LogEntry, verdict: &Verdict) -> GateOutcome {
        if !self.policy.escalates(verdict) {
            return GateOutcome::Ignored;
        }

        self.stats.record(|s| s.escalated += 1);

        // Incidents are recorded before, and independently of, the allow-list
        let result = self.medic.log_incident(verdict).await;
        if self.settle("log_incident", result) {
            self.stats.record(|s| s.incidents += 1);
        }

        let action = verdict.recommended_action;
        if !self.policy.allows(action) {
            warn!(
                source = %entry.source,
                action = %action,
                "Recommended action not permitted; falling back to ALERT"
            );
            self.stats.record(|s| s.fallbacks += 1);
            self.alert(&format!(
                "Recommended action '{}' not permitted for {}; falling back to ALERT. {}",
                action, entry.source, verdict.diagnosis
            ))
            .await;
            return GateOutcome::Fallback { requested: action };
        }

        match action {
            HealingAction::RestartService => self.restart(&entry.source).await,
            HealingAction::Alert => {
                self.alert(&format!(
                    "Anomaly detected in {}: {}",
                    entry.source, verdict.diagnosis
                ))
                .await;
                GateOutcome::Alerted
            }
            HealingAction::None | HealingAction::IsolateModule => {
                info!(
                    source = %entry.source,
                    action = %action,
                    "No executor for allowed action; skipping"
                );
                self.stats.record(|s| s.unhandled_actions += 1);
                GateOutcome::NoExecutor { action }
            }
        }
    }

    /// Restart `target` unless it is still cooling down
    async fn restart(&mut self, target: &str) -> GateOutcome {
        let now = tokio::time::Instant::now().into_std();

        match self.cooldown.try_acquire(target, now) {
            Ok(()) => {
                let result = self.medic.restart(target).await;
                if self.settle("restart", result) {
                    self.stats.record(|s| s.restarts += 1);
                }
                GateOutcome::Restarted {
                    target: target.to_string(),
                }
            }
            Err(ResilienceError::CoolingDown { remaining, .. }) => {
                warn!(
                    module = target,
                    remaining_s = remaining.as_secs(),
                    "⏸️  Restart rate limited"
                );
                self.stats.record(|s| s.rate_limited += 1);
                self.alert(&format!(
                    "Restart of {} rate limited; next restart allowed in {}s",
                    target,
                    remaining.as_secs()
                ))
                .await;
                GateOutcome::RateLimited {
                    target: target.to_string(),
                    remaining,
                }
            }
        }
    }

    async fn alert(&self, message: &str) {
        let result = self.medic.alert(message).await;
        if self.settle("alert", result) {
            self.stats.record(|s| s.alerts += 1);
        }
    }

    /// Log and count an executor failure; `true` if the executor succeeded
    fn settle(&self, executor: &'static str, result: Result<(), HealError>) -> bool {
        match result {
            Ok(()) => {
                debug!(executor, "executor completed");
                true
            }
            Err(e) => {
                error!(executor, error = %e, "❌ Healing executor failed");
                self.stats.record(|s| s.executor_failures += 1);
                false
            }
        }
    }

    /// Read access to the restart cooldown state
    pub fn cooldown(&self) -> &CooldownTracker {
        &self.cooldown
    }
}
