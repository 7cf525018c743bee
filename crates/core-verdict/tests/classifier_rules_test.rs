//! Rule table properties
//!
//! Exercises every branch of the classifier against a spread of levels and
//! message casings and checks that each verdict matches its rule row.

use pulsar_core_verdict::{analyze, HealingAction, LogEntry, LogLevel, Verdict};

const LEVELS: [LogLevel; 4] = [
    LogLevel::Info,
    LogLevel::Warning,
    LogLevel::Error,
    LogLevel::Critical,
];

fn verdict(level: LogLevel, message: &str) -> Verdict {
    analyze(&LogEntry::new(level, "svc", message))
}

#[test]
fn critical_or_exception_restarts() {
    for message in ["Unhandled Exception", "EXCEPTION in worker", "ok", "leak", "timeout"] {
        let v = verdict(LogLevel::Critical, message);
        assert_eq!(v.severity, 9, "CRITICAL/{message}");
        assert!(v.is_anomaly);
        assert_eq!(v.recommended_action, HealingAction::RestartService);
    }

    for level in LEVELS {
        let v = verdict(level, "A critical exception occurred.");
        assert_eq!(v.severity, 9, "{level}");
        assert_eq!(v.recommended_action, HealingAction::RestartService);
    }
}

#[test]
fn error_or_timeout_alerts() {
    for message in ["disk full", "Memory leak", "TimeOut waiting"] {
        let v = verdict(LogLevel::Error, message);
        assert_eq!(v.severity, 7, "ERROR/{message}");
        assert!(v.is_anomaly);
        assert_eq!(v.recommended_action, HealingAction::Alert);
    }

    for level in [LogLevel::Info, LogLevel::Warning] {
        let v = verdict(level, "upstream TIMEOUT");
        assert_eq!(v.severity, 7);
        assert_eq!(v.recommended_action, HealingAction::Alert);
    }
}

#[test]
fn leak_restarts_when_no_earlier_rule_matches() {
    for level in [LogLevel::Info, LogLevel::Warning] {
        let v = verdict(level, "Possible handle LEAK in pool");
        assert_eq!(v.severity, 8);
        assert!(v.is_anomaly);
        assert_eq!(v.recommended_action, HealingAction::RestartService);
    }
}

#[test]
fn everything_else_is_nominal() {
    for level in [LogLevel::Info, LogLevel::Warning] {
        let v = verdict(level, "request served in 12ms");
        assert_eq!(v.severity, 1);
        assert!(!v.is_anomaly);
        assert_eq!(v.recommended_action, HealingAction::None);
    }
}

#[test]
fn every_verdict_is_consistent() {
    let messages = ["", "exception", "timeout", "leak", "healthy", "Leak Timeout Exception"];
    for level in LEVELS {
        for message in messages {
            let v = verdict(level, message);
            assert!(v.is_consistent(), "{level}/{message:?} -> {v:?}");
        }
    }
}

#[test]
fn classification_is_deterministic() {
    let entry = LogEntry::new(LogLevel::Warning, "cache", "slow leak")
        .with_timestamp("2024-01-01T12:00:00");
    assert_eq!(analyze(&entry), analyze(&entry.clone()));
}
