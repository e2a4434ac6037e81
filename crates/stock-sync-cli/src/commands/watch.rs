//! `stock-sync watch` command implementation
//!
//! Polls a job's snapshot and renders it as a progress bar until the job is
//! `complete` or `error`.

use crate::api::ApiClient;
use crate::error::{CliError, Result};
use crate::progress::{apply_snapshot, create_job_progress};
use colored::Colorize;
use std::time::Duration;
use stock_sync_common::JobStatus;

/// Default delay between two progress polls
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Lower bound so a typo cannot hammer the server
const MIN_POLL_INTERVAL_MS: u64 = 50;

/// Follow a job until it ends
pub async fn run(server_url: String, job_id: String, interval_ms: u64) -> Result<()> {
    let client = ApiClient::new(server_url)?;
    let interval = Duration::from_millis(interval_ms.max(MIN_POLL_INTERVAL_MS));

    follow(&client, &job_id, interval).await
}

/// Poll `job_id` every `interval`; a job ending in `error` is returned as
/// [`CliError::JobFailed`]
pub async fn follow(client: &ApiClient, job_id: &str, interval: Duration) -> Result<()> {
    let pb = create_job_progress(job_id);

    loop {
        let job = match client.get_progress(job_id).await {
            Ok(job) => job,
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        };

        apply_snapshot(&pb, &job);

        match job.status {
            JobStatus::Complete => {
                pb.finish_and_clear();
                println!("{} {}", "✓".green().bold(), job.message);
                return Ok(());
            }
            JobStatus::Error => {
                pb.abandon();
                println!("{} {}", "✗".red().bold(), job.message);
                return Err(CliError::JobFailed {
                    job_id: job_id.to_string(),
                    message: job.message,
                });
            }
            JobStatus::Init | JobStatus::Running => {
                tracing::debug!(job_id, percent = job.percent, step = %job.step, "Polled progress");
            }
        }

        tokio::time::sleep(interval).await;
    }
}
