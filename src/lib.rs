/*!
 * Pulsar - Integrity monitoring and self-healing
 *
 * Watches a stream of structured log events and reacts to anomalies:
 * - Deterministic rule-based classification (pulsar-core-verdict)
 * - Policy-gated healing: alert, restart, incident records (pulsar-sentinel)
 * - Per-target restart cooldown (pulsar-core-resilience)
 * - Manual integrity self-check of internal state
 *
 * This crate holds the CLI surface: settings, logging and the subcommands.
 */

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{CliConfig, LogLevel};
pub use error::{PulsarError, Result};
pub use pulsar_core_verdict::{analyze, HealingAction, LogEntry, Verdict};
pub use pulsar_sentinel::{IntegrityManager, IntegrityPolicy, TracingMedic};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
