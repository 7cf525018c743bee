//! Medic: Healing Action Executors
//!
//! The Medic performs the side effects the action gate decides on: raising
//! an alert, restarting a target, and recording an incident. Every executor
//! is best-effort. A failure comes back as a [`HealError`] that the gate logs
//! and counts; it never aborts the monitor loop.
//!
//! [`TracingMedic`] is the default implementation and reports through
//! `tracing`. Deployments that route alerts to a notification channel or
//! restarts to a process supervisor provide their own [`Medic`].

use crate::error::HealError;
use async_trait::async_trait;
use pulsar_core_verdict::Verdict;
use std::time::Duration;
use tracing::{error, info, warn};

/// Side-effecting healing primitives
///
/// Implementations must be safe to call from the monitor task and should
/// return promptly.
#[async_trait]
pub trait Medic: Send + Sync {
    /// Emit a warning-level notification
    async fn alert(&self, message: &str) -> Result<(), HealError>;

    /// Stop and start the named target
    async fn restart(&self, target: &str) -> Result<(), HealError>;

    /// Record a critical-level incident for an escalated verdict
    async fn log_incident(&self, verdict: &Verdict) -> Result<(), HealError>;
}

/// Medic that reports every action through `tracing`
///
/// Restarts are simulated: the stop/start cycle is logged and, if a settle
/// delay is configured, the task sleeps between the two phases.
#[derive(Debug, Clone, Default)]
pub struct TracingMedic {
    settle_delay: Duration,
}

impl TracingMedic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause between the simulated stop and start phases
    pub fn with_settle_delay(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }
}

#[async_trait]
impl Medic for TracingMedic {
    async fn alert(&self, message: &str) -> Result<(), HealError> {
        warn!(target: "pulsar::alert", "🚨 ALERT: {}", message);
        Ok(())
    }

    async fn restart(&self, target: &str) -> Result<(), HealError> {
        info!(target: "pulsar::medic", module = target, "🚑 Medic: stopping module");
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
        info!(target: "pulsar::medic", module = target, "   ✅ Module restarted");
        Ok(())
    }

    async fn log_incident(&self, verdict: &Verdict) -> Result<(), HealError> {
        error!(
            target: "pulsar::incident",
            level = "CRITICAL",
            severity = verdict.severity,
            action = %verdict.recommended_action,
            "💀 INCIDENT: {}",
            verdict.diagnosis
        );
        Ok(())
    }
}
