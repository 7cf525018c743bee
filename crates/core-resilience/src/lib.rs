//! Pulsar Core Resilience: Pure-logic fault tolerance primitives
//!
//! # Overview
//!
//! Building blocks that keep corrective actions from making things worse.
//! Currently this is the per-target cooldown used to stop a failing service
//! from being restarted in a tight loop.
//!
//! # Key Principles
//!
//! This crate is **pure logic** with zero knowledge of:
//! - Queues, runtimes or executors
//! - Log formats or classifiers
//! - Application-specific concerns
//!
//! Time is always passed in by the caller.
//!
//! ```text
//!   anomaly ──► "restart db?" ──► CooldownTracker ──┬──► Ok: restart, record now
//!                                                   └──► CoolingDown: warn instead
//! ```

pub mod cooldown;
pub mod error;

// Re-export main types for convenience
pub use cooldown::{CooldownTracker, DEFAULT_COOLDOWN};
pub use error::ResilienceError;
