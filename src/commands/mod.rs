/*!
 * Pulsar subcommands
 *
 * Each command takes an already-built integrity manager (or plain arguments)
 * so it can be driven from tests without a process or a terminal.
 */

pub mod check;
pub mod classify;
pub mod watch;

pub use check::{check, require_nominal};
pub use classify::classify;
pub use watch::{open_input, watch, WatchSummary};
