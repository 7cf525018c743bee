/*!
 * `pulsar classify`: run the classifier on one event
 */

use crate::error::Result;
use pulsar_core_verdict::{analyze, LogEntry, LogLevel, Verdict};

/// Classify a single event given on the command line
///
/// The level is parsed case-insensitively; an unknown level is a validation
/// error.
pub fn classify(level: &str, source: &str, message: &str) -> Result<Verdict> {
    let level: LogLevel = level.parse()?;
    Ok(analyze(&LogEntry::new(level, source, message)))
}
