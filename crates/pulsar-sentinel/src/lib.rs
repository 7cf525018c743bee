//! Pulsar Sentinel: Integrity Monitoring & Self-Healing Engine
//!
//! The Sentinel is the "Immune System" of a Pulsar-managed process. It
//! consumes structured log events, classifies each one, and, when the
//! policy allows, dispatches corrective actions.
//!
//! # Architecture: The OODA Loop
//!
//! ```text
//! ┌─────────────┐
//! │  Observe    │──> Dequeue the next LogEntry (FIFO)
//! └──────┬──────┘
//!        │
//!        v
//! ┌─────────────┐
//! │  Orient     │──> analyze(): severity, anomaly, recommended action
//! └──────┬──────┘
//!        │
//!        v
//! ┌─────────────┐
//! │  Decide     │──> Escalate? Allowed? Cooling down?
//! └──────┬──────┘
//!        │
//!        v
//! ┌─────────────┐
//! │  Act        │──> Medic: incident, alert, restart
//! └──────┬──────┘
//!        │
//!        └────> Loop
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pulsar_sentinel::{IntegrityManager, TracingMedic};
//! use std::sync::Arc;
//!
//! # async fn example() -> pulsar_sentinel::Result<()> {
//! let manager = IntegrityManager::from_config(
//!     "config/integrity_config.yaml",
//!     Arc::new(TracingMedic::new()),
//! )?;
//! manager.start()?;
//!
//! manager.submit_json(r#"{"level":"CRITICAL","source":"db","message":"Connection lost"}"#)?;
//!
//! manager.drain().await?;
//! manager.stop().await?;
//! println!("{}", manager.stats().summary());
//! # Ok(())
//! # }
//! ```

pub mod daemon;
pub mod error;
pub mod gate;
pub mod integrity;
pub mod medic;
pub mod metrics;
pub mod policy;

pub use daemon::{IntegrityManager, ManagerState};
pub use error::{HealError, Result, SentinelError};
pub use gate::{ActionGate, GateOutcome};
pub use integrity::{IntegrityReport, IntegrityStatus};
pub use medic::{Medic, TracingMedic};
pub use metrics::MonitorStats;
pub use policy::{IntegrityPolicy, SensitivityThresholds, DEFAULT_CONFIG_PATH};
