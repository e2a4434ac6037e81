//! Stock Sync CLI Library
//!
//! Operator command line for the stock sync server.
//!
//! # Overview
//!
//! - **Start a run**: `stock-sync start [--watch]`
//! - **Follow a run**: `stock-sync watch <job_id>` renders a progress bar until
//!   the job ends; a failed job exits with status 1
//! - **Inspect**: `stock-sync progress <job_id>`, `stock-sync active`
//! - **History**: `stock-sync logs [--limit N]`, `stock-sync clear-logs`

pub mod api;
pub mod commands;
pub mod error;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use error::{CliError, Result};

use api::client::DEFAULT_SERVER_URL;
use clap::{Parser, Subcommand};

/// stock-sync - reconcile catalog stock with a supplier CSV feed
#[derive(Parser, Debug)]
#[command(name = "stock-sync")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Server URL
    #[arg(long, env = "STOCK_SYNC_SERVER_URL", default_value = DEFAULT_SERVER_URL, global = true)]
    pub server_url: String,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a manual sync run
    Start {
        /// Follow the run until it finishes
        #[arg(short, long)]
        watch: bool,
    },

    /// Show the progress snapshot of a run
    Progress {
        /// Job id returned by `start`
        job_id: String,
    },

    /// Follow a run with a progress bar until it finishes
    Watch {
        /// Job id returned by `start`
        job_id: String,

        /// Poll interval in milliseconds
        #[arg(long, default_value_t = commands::watch::DEFAULT_POLL_INTERVAL_MS)]
        interval_ms: u64,
    },

    /// Show the run currently in progress
    Active,

    /// Show the run history, most recent first
    Logs {
        /// Limit number of runs to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Clear the run history
    ClearLogs,
}
