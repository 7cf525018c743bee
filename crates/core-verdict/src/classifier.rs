//! Deterministic anomaly classifier
//!
//! The classifier is a fixed, ordered rule table. Rules are evaluated top to
//! bottom and the first match wins; a message such as "timeout exception"
//! matches both the exception and the timeout rule, and the ordering decides.
//!
//! ```text
//! #  trigger                               severity  anomaly  action
//! 1  "exception" in message | CRITICAL       9        yes      RESTART_SERVICE
//! 2  "timeout" in message   | ERROR          7        yes      ALERT
//! 3  "leak" in message                       8        yes      RESTART_SERVICE
//! 4  anything else                           1        no       NONE
//! ```
//!
//! Keyword matching is a case-insensitive substring test on the message.
//! Level triggers are exact enum comparisons.

use crate::entry::{LogEntry, LogLevel};
use crate::verdict::{HealingAction, Verdict};

/// One row of the classification table
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Short identifier used in diagnostics
    pub name: &'static str,
    /// Lower-case substrings; any hit in the message matches
    pub keywords: &'static [&'static str],
    /// Levels that match regardless of the message
    pub levels: &'static [LogLevel],
    /// `true` matches every entry (fallback row)
    pub catch_all: bool,
    pub severity: u8,
    pub is_anomaly: bool,
    pub action: HealingAction,
    /// Diagnosis template; `{source}` is replaced with the entry's source
    pub diagnosis: &'static str,
}

impl Rule {
    /// Whether this rule fires for an entry whose message is already lower-cased
    fn matches(&self, level: LogLevel, lowered_message: &str) -> bool {
        self.catch_all
            || self.levels.contains(&level)
            || self.keywords.iter().any(|k| lowered_message.contains(k))
    }

    fn verdict_for(&self, entry: &LogEntry) -> Verdict {
        Verdict {
            severity: self.severity,
            is_anomaly: self.is_anomaly,
            diagnosis: self.diagnosis.replace("{source}", &entry.source),
            recommended_action: self.action,
        }
    }
}

/// The rule table, in evaluation order
pub const RULES: &[Rule] = &[
    Rule {
        name: "critical-failure",
        keywords: &["exception"],
        levels: &[LogLevel::Critical],
        catch_all: false,
        severity: 9,
        is_anomaly: true,
        action: HealingAction::RestartService,
        diagnosis: "Critical failure or unhandled exception reported by {source}",
    },
    Rule {
        name: "error-or-timeout",
        keywords: &["timeout"],
        levels: &[LogLevel::Error],
        catch_all: false,
        severity: 7,
        is_anomaly: true,
        action: HealingAction::Alert,
        diagnosis: "Error condition or timeout reported by {source}",
    },
    Rule {
        name: "resource-leak",
        keywords: &["leak"],
        levels: &[],
        catch_all: false,
        severity: 8,
        is_anomaly: true,
        action: HealingAction::RestartService,
        diagnosis: "Possible resource leak in {source}",
    },
    Rule {
        name: "nominal",
        keywords: &[],
        levels: &[],
        catch_all: true,
        severity: 1,
        is_anomaly: false,
        action: HealingAction::None,
        diagnosis: "No anomaly detected in {source}",
    },
];

/// Return the first rule that matches the entry
pub fn matching_rule(entry: &LogEntry) -> &'static Rule {
    let lowered = entry.message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(entry.level, &lowered))
        .unwrap_or(&RULES[RULES.len() - 1])
}

/// Classify one log entry
///
/// Pure, deterministic and total: every entry yields a verdict.
pub fn analyze(entry: &LogEntry) -> Verdict {
    matching_rule(entry).verdict_for(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: LogLevel, message: &str) -> LogEntry {
        LogEntry::new(level, "test_module", message)
    }

    #[test]
    fn test_last_rule_is_catch_all() {
        let last = RULES.last().unwrap();
        assert!(last.catch_all);
        assert!(RULES[..RULES.len() - 1].iter().all(|r| !r.catch_all));
    }

    #[test]
    fn test_every_rule_is_consistent() {
        for rule in RULES {
            let verdict = rule.verdict_for(&entry(LogLevel::Info, ""));
            assert!(verdict.is_consistent(), "rule {} is inconsistent", rule.name);
        }
    }

    #[test]
    fn test_memory_leak_on_error_level() {
        // ERROR level wins over the leak keyword because rule 2 precedes rule 3
        let verdict = analyze(&entry(LogLevel::Error, "Memory Leak detected"));
        assert!(verdict.severity > 5);
        assert!(verdict.is_anomaly);
        assert_eq!(verdict.severity, 7);
        assert_eq!(verdict.recommended_action, HealingAction::Alert);
    }

    #[test]
    fn test_exception_beats_timeout() {
        let verdict = analyze(&entry(LogLevel::Info, "Timeout raised an EXCEPTION"));
        assert_eq!(verdict.severity, 9);
        assert_eq!(verdict.recommended_action, HealingAction::RestartService);
    }

    #[test]
    fn test_timeout_beats_leak() {
        let verdict = analyze(&entry(LogLevel::Warning, "leak check timeout"));
        assert_eq!(verdict.severity, 7);
        assert_eq!(verdict.recommended_action, HealingAction::Alert);
    }

    #[test]
    fn test_diagnosis_names_source() {
        let verdict = analyze(&LogEntry::new(LogLevel::Critical, "db", "down"));
        assert!(verdict.diagnosis.contains("db"));
    }

    #[test]
    fn test_matching_rule_names() {
        assert_eq!(matching_rule(&entry(LogLevel::Critical, "x")).name, "critical-failure");
        assert_eq!(matching_rule(&entry(LogLevel::Info, "LeAk")).name, "resource-leak");
        assert_eq!(matching_rule(&entry(LogLevel::Info, "fine")).name, "nominal");
    }
}
