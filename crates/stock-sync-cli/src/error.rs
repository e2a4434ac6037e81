//! Error types for the stock sync CLI
//!
//! Messages are written for operators: each says what went wrong and what to
//! run next.

use stock_sync_common::JobId;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// User-facing CLI failures
#[derive(Error, Debug)]
pub enum CliError {
    /// Server answered with an error envelope or an unexpected status
    #[error("Server error: {0}. Ensure the stock sync server is running and reachable at --server-url.")]
    Api(String),

    /// Start was rejected because another job holds the claim
    #[error("A sync is already running (job {active_job_id}). Follow it with 'stock-sync watch {active_job_id}'.")]
    SyncInProgress { active_job_id: JobId },

    /// Progress snapshot is unknown or has expired
    #[error("Sync job '{0}' not found. Snapshots expire a few minutes after a job ends; run 'stock-sync active' to find the running job.")]
    JobNotFound(String),

    /// Watched job ended in `error`
    #[error("Sync job '{job_id}' failed: {message}")]
    JobFailed { job_id: JobId, message: String },

    /// HTTP request failed
    #[error("Network request failed: {0}. Check the server URL and that the server is up.")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse server response: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables and flags.")]
    Config(String),
}

impl CliError {
    /// Create an API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
