//! Internal state self-check
//!
//! The manager keeps a small piece of critical state and the BLAKE3 digest it
//! had at construction. A manual check re-hashes the state and compares; any
//! difference means something inside the process overwrote it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::RwLock;

const INITIAL_STATE: &str = "initial_state_checksum";

/// Result of a manual integrity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrityStatus {
    Nominal,
    Corrupted,
}

impl fmt::Display for IntegrityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityStatus::Nominal => f.write_str("nominal"),
            IntegrityStatus::Corrupted => f.write_str("corrupted"),
        }
    }
}

/// Report returned by `check_integrity`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub status: IntegrityStatus,
    pub checked_at: DateTime<Utc>,
}

/// Critical state plus its baseline fingerprint
#[derive(Debug)]
pub struct IntegrityMarker {
    baseline: blake3::Hash,
    critical_data: RwLock<String>,
}

impl Default for IntegrityMarker {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegrityMarker {
    pub fn new() -> Self {
        Self {
            baseline: blake3::hash(INITIAL_STATE.as_bytes()),
            critical_data: RwLock::new(INITIAL_STATE.to_string()),
        }
    }

    /// Compare the current state against the baseline
    ///
    /// Takes only a read lock, so concurrent checks never block each other.
    pub fn status(&self) -> IntegrityStatus {
        let data = self
            .critical_data
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if blake3::hash(data.as_bytes()) == self.baseline {
            IntegrityStatus::Nominal
        } else {
            IntegrityStatus::Corrupted
        }
    }

    /// Overwrite the critical state
    ///
    /// Fault injection for exercising the corruption path; nothing in the
    /// crate calls this outside tests.
    #[doc(hidden)]
    pub fn overwrite(&self, value: &str) {
        let mut data = self
            .critical_data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *data = value.to_string();
    }
}
