//! Sentinel Policy Engine
//!
//! Defines the thresholds and the action allow-list that govern when a
//! verdict is escalated and which corrective actions may run.
//!
//! The policy is loaded once when the integrity manager is built and is
//! read-only afterwards. Loading never fails: a missing or unreadable
//! document, a missing key, or an out-of-range value each fall back to the
//! documented default with a warning.

use crate::error::{Result, SentinelError};
use pulsar_core_verdict::{HealingAction, Verdict, MAX_SEVERITY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Default location of the integrity configuration document
pub const DEFAULT_CONFIG_PATH: &str = "config/integrity_config.yaml";

/// Escalation thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityThresholds {
    /// Verdicts with severity strictly above this value are escalated even
    /// when they are not flagged as anomalies
    ///
    /// **Default:** 7
    #[serde(default = "default_severity_threshold")]
    pub severity: u8,
}

impl Default for SensitivityThresholds {
    fn default() -> Self {
        Self {
            severity: default_severity_threshold(),
        }
    }
}

/// Sentinel operational policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityPolicy {
    #[serde(default)]
    pub sensitivity_thresholds: SensitivityThresholds,

    /// Actions the gate may execute; anything else is downgraded to an alert
    ///
    /// **Default:** `["ALERT"]`
    #[serde(default = "default_allowed_actions")]
    pub allowed_actions: BTreeSet<HealingAction>,

    /// Minimum time between two restarts of the same target
    ///
    /// **Default:** 300
    #[serde(default = "default_restart_cooldown_secs")]
    pub restart_cooldown_secs: u64,
}

fn default_severity_threshold() -> u8 {
    7
}

fn default_allowed_actions() -> BTreeSet<HealingAction> {
    BTreeSet::from([HealingAction::Alert])
}

fn default_restart_cooldown_secs() -> u64 {
    300
}

impl Default for IntegrityPolicy {
    fn default() -> Self {
        Self {
            sensitivity_thresholds: SensitivityThresholds::default(),
            allowed_actions: default_allowed_actions(),
            restart_cooldown_secs: default_restart_cooldown_secs(),
        }
    }
}

/// Document format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

impl IntegrityPolicy {
    /// Create a policy that allows exactly the given actions
    ///
    /// Other parameters will use defaults.
    pub fn with_allowed_actions(actions: impl IntoIterator<Item = HealingAction>) -> Self {
        Self {
            allowed_actions: actions.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Severity threshold above which verdicts are escalated
    pub fn severity_threshold(&self) -> u8 {
        self.sensitivity_thresholds.severity
    }

    /// Restart cooldown window
    pub fn restart_cooldown(&self) -> Duration {
        Duration::from_secs(self.restart_cooldown_secs)
    }

    /// Escalation predicate: anomalous, or severity above the threshold
    pub fn escalates(&self, verdict: &Verdict) -> bool {
        verdict.is_anomaly || verdict.severity > self.severity_threshold()
    }

    /// Whether an action is on the allow-list
    pub fn allows(&self, action: HealingAction) -> bool {
        self.allowed_actions.contains(&action)
    }

    /// Validate the policy configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.sensitivity_thresholds.severity > MAX_SEVERITY {
            return Err(format!(
                "sensitivity_thresholds.severity must be at most {}",
                MAX_SEVERITY
            ));
        }

        if self.restart_cooldown_secs == 0 {
            return Err("restart_cooldown_secs must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Load the policy from a YAML, JSON or TOML document
    ///
    /// Never fails. Problems are logged as warnings and the affected values
    /// keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match read_document(path) {
            Ok(Some(document)) => {
                debug!(path = %path.display(), "Loaded integrity config");
                Self::from_document(&document)
            }
            Ok(None) => {
                warn!(
                    path = %path.display(),
                    "Integrity config not found; using default values"
                );
                Self::default()
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read integrity config; using default values"
                );
                Self::default()
            }
        }
    }

    /// Build a policy from an already-parsed document, key by key
    pub fn from_document(document: &Value) -> Self {
        let mut policy = Self::default();

        if let Some(raw) = document.pointer("/sensitivity_thresholds/severity") {
            match raw.as_i64() {
                Some(severity) => {
                    let clamped = severity.clamp(0, MAX_SEVERITY as i64);
                    if clamped != severity {
                        warn!(
                            value = severity,
                            clamped,
                            "sensitivity_thresholds.severity out of range; clamping"
                        );
                    }
                    policy.sensitivity_thresholds.severity = clamped as u8;
                }
                None => warn!(
                    value = %raw,
                    "Ignoring non-integer sensitivity_thresholds.severity; using default"
                ),
            }
        }

        if let Some(raw) = document.get("allowed_actions") {
            match raw.as_array() {
                Some(items) => {
                    policy.allowed_actions = items
                        .iter()
                        .filter_map(|item| match item.as_str().map(HealingAction::from_wire) {
                            Some(Ok(action)) => Some(action),
                            _ => {
                                warn!(value = %item, "Skipping unknown action in allowed_actions");
                                None
                            }
                        })
                        .collect();
                }
                None => warn!(
                    value = %raw,
                    "allowed_actions must be a list; using default"
                ),
            }
        }

        if let Some(raw) = document.get("restart_cooldown_secs") {
            match raw.as_u64().filter(|v| *v > 0) {
                Some(secs) => policy.restart_cooldown_secs = secs,
                None => warn!(
                    value = %raw,
                    "Ignoring invalid restart_cooldown_secs; using default"
                ),
            }
        }

        policy
    }
}

/// Read and parse a config document; `Ok(None)` if the file does not exist
fn read_document(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)?;
    let document = match ConfigFormat::from_path(path) {
        ConfigFormat::Yaml => serde_yaml::from_str::<Value>(&contents)
            .map_err(|e| SentinelError::Config(e.to_string()))?,
        ConfigFormat::Json => serde_json::from_str::<Value>(&contents)
            .map_err(|e| SentinelError::Config(e.to_string()))?,
        ConfigFormat::Toml => toml::from_str::<Value>(&contents)
            .map_err(|e| SentinelError::Config(e.to_string()))?,
    };

    Ok(Some(document))
}
