//! Pulsar Core Verdict: log event schema and deterministic classifier
//!
//! This crate is pure logic. It knows how to validate an inbound log event
//! and how to judge it; it knows nothing about queues, executors or policy.
//!
//! ```text
//! producer ──► LogEntry ──► analyze() ──► Verdict { severity, is_anomaly,
//!                                                   diagnosis, recommended_action }
//! ```
//!
//! # Example
//!
//! ```
//! use pulsar_core_verdict::{analyze, HealingAction, LogEntry, LogLevel};
//!
//! let entry = LogEntry::new(LogLevel::Critical, "db", "Connection timeout to primary database.");
//! let verdict = analyze(&entry);
//!
//! assert_eq!(verdict.severity, 9);
//! assert!(verdict.is_anomaly);
//! assert_eq!(verdict.recommended_action, HealingAction::RestartService);
//! ```

pub mod classifier;
pub mod entry;
pub mod error;
pub mod verdict;

pub use classifier::{analyze, matching_rule, Rule, RULES};
pub use entry::{LogEntry, LogLevel};
pub use error::{Error, Result};
pub use verdict::{HealingAction, Verdict, MAX_SEVERITY};
