//! `stock-sync start` command implementation
//!
//! Starts a manual sync run and optionally follows it to completion.

use crate::api::ApiClient;
use crate::commands::watch;
use crate::error::Result;
use colored::Colorize;
use std::time::Duration;

/// Start a sync run
pub async fn run(server_url: String, follow: bool) -> Result<()> {
    let client = ApiClient::new(server_url)?;

    let response = client.start_sync().await?;
    tracing::debug!(job_id = %response.job_id, status = %response.status, "Start request accepted");

    println!("{} Sync started: {}", "✓".green(), response.job_id);

    if follow {
        watch::follow(
            &client,
            &response.job_id,
            Duration::from_millis(watch::DEFAULT_POLL_INTERVAL_MS),
        )
        .await
    } else {
        println!("Follow progress with 'stock-sync watch {}'", response.job_id);
        Ok(())
    }
}
