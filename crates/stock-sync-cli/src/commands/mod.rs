//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod active;
pub mod clear_logs;
pub mod logs;
pub mod progress;
pub mod start;
pub mod watch;
