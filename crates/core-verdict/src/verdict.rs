//! Classifier output types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest severity a verdict may carry
pub const MAX_SEVERITY: u8 = 10;

/// Corrective action recommended for a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealingAction {
    None,
    Alert,
    RestartService,
    IsolateModule,
}

impl HealingAction {
    /// Wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            HealingAction::None => "NONE",
            HealingAction::Alert => "ALERT",
            HealingAction::RestartService => "RESTART_SERVICE",
            HealingAction::IsolateModule => "ISOLATE_MODULE",
        }
    }

    /// Strict parse of the exact wire name, as used in policy documents
    pub fn from_wire(s: &str) -> Result<Self> {
        match s {
            "NONE" => Ok(HealingAction::None),
            "ALERT" => Ok(HealingAction::Alert),
            "RESTART_SERVICE" => Ok(HealingAction::RestartService),
            "ISOLATE_MODULE" => Ok(HealingAction::IsolateModule),
            _ => Err(Error::invalid_action(s)),
        }
    }
}

impl fmt::Display for HealingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive parse for command-line input
impl FromStr for HealingAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        HealingAction::from_wire(&s.trim().to_ascii_uppercase())
            .map_err(|_| Error::invalid_action(s))
    }
}

/// The classifier's judgment on one log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// 0 = none, 10 = critical
    pub severity: u8,
    pub is_anomaly: bool,
    pub diagnosis: String,
    pub recommended_action: HealingAction,
}

impl Verdict {
    /// Check the severity range and the anomaly/action pairing
    ///
    /// Anomalous verdicts must recommend an action; nominal verdicts must
    /// recommend [`HealingAction::None`].
    pub fn is_consistent(&self) -> bool {
        if self.severity > MAX_SEVERITY {
            return false;
        }
        self.is_anomaly == (self.recommended_action != HealingAction::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_names() {
        let json = serde_json::to_string(&HealingAction::RestartService).unwrap();
        assert_eq!(json, "\"RESTART_SERVICE\"");

        let action: HealingAction = serde_json::from_str("\"ISOLATE_MODULE\"").unwrap();
        assert_eq!(action, HealingAction::IsolateModule);
    }

    #[test]
    fn test_action_parse() {
        assert_eq!("alert".parse::<HealingAction>().unwrap(), HealingAction::Alert);
        assert!("REBOOT".parse::<HealingAction>().is_err());
    }

    #[test]
    fn test_action_wire_name_is_exact() {
        assert_eq!(
            HealingAction::from_wire("RESTART_SERVICE").unwrap(),
            HealingAction::RestartService
        );
        assert!(matches!(
            HealingAction::from_wire("restart_service"),
            Err(Error::InvalidAction(_))
        ));
        assert!(HealingAction::from_wire(" ALERT").is_err());
    }

    #[test]
    fn test_consistency_rejects_out_of_range() {
        let verdict = Verdict {
            severity: 11,
            is_anomaly: true,
            diagnosis: String::new(),
            recommended_action: HealingAction::Alert,
        };
        assert!(!verdict.is_consistent());
    }

    #[test]
    fn test_consistency_rejects_silent_anomaly() {
        let verdict = Verdict {
            severity: 8,
            is_anomaly: true,
            diagnosis: String::new(),
            recommended_action: HealingAction::None,
        };
        assert!(!verdict.is_consistent());
    }
}
