//! Per-key cooldown tracking for repeated corrective actions
//!
//! A [`CooldownTracker`] remembers when each key last acted and refuses a new
//! action until the cooldown window has elapsed. Only a successful acquire
//! records a timestamp, so a burst of rejected attempts never extends the
//! window.
//!
//! The caller supplies `now`. This keeps the tracker pure and lets tests
//! drive it with a paused or synthetic clock.
//!
//! # Example
//!
//! ```
//! use pulsar_core_resilience::CooldownTracker;
//! use std::time::{Duration, Instant};
//!
//! let mut tracker = CooldownTracker::new(Duration::from_secs(300));
//! let t0 = Instant::now();
//!
//! assert!(tracker.try_acquire("db", t0).is_ok());
//! assert!(tracker.try_acquire("db", t0 + Duration::from_secs(10)).is_err());
//! assert!(tracker.try_acquire("cache", t0).is_ok());
//! assert!(tracker.try_acquire("db", t0 + Duration::from_secs(300)).is_ok());
//! ```

use crate::error::ResilienceError;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::trace;

/// Default cooldown between repeated actions on the same key
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(300);

/// Tracks the last action time per key
#[derive(Debug, Clone)]
pub struct CooldownTracker {
    window: Duration,
    last_fired: HashMap<String, Instant>,
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl CooldownTracker {
    /// Create a tracker with the given cooldown window
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: HashMap::new(),
        }
    }

    /// Claim the right to act on `key` at `now`
    ///
    /// Succeeds if the key has never acted or its window has fully elapsed,
    /// and records `now` as the key's last action time. Otherwise returns
    /// [`ResilienceError::CoolingDown`] and leaves the state untouched.
    pub fn try_acquire(&mut self, key: &str, now: Instant) -> Result<(), ResilienceError> {
        if let Some(remaining) = self.remaining(key, now) {
            trace!(key, remaining_s = remaining.as_secs(), "cooldown rejected");
            return Err(ResilienceError::CoolingDown {
                key: key.to_string(),
                remaining,
            });
        }

        self.last_fired.insert(key.to_string(), now);
        Ok(())
    }

    /// Time left before `key` may act again, or `None` if it may act now
    pub fn remaining(&self, key: &str, now: Instant) -> Option<Duration> {
        let last = self.last_fired.get(key)?;
        let elapsed = now.saturating_duration_since(*last);
        if elapsed < self.window {
            Some(self.window - elapsed)
        } else {
            None
        }
    }

    /// When `key` last acted
    pub fn last_fired(&self, key: &str) -> Option<Instant> {
        self.last_fired.get(key).copied()
    }

    /// Forget a single key
    pub fn reset(&mut self, key: &str) {
        self.last_fired.remove(key);
    }

    /// Forget every key
    pub fn clear(&mut self) {
        self.last_fired.clear();
    }

    /// Number of keys with a recorded action
    pub fn len(&self) -> usize {
        self.last_fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fired.is_empty()
    }

    /// Configured cooldown window
    pub fn window(&self) -> Duration {
        self.window
    }
}
