//! `stock-sync active` command implementation
//!
//! Shows the job currently holding the single-flight claim, if any.

use crate::api::ApiClient;
use crate::error::Result;
use crate::output::print_job;

/// Show the active job
pub async fn run(server_url: String) -> Result<()> {
    let client = ApiClient::new(server_url)?;

    let active = client.get_active().await?;

    match (active.sync_id, active.progress) {
        (Some(job_id), Some(job)) if active.active => {
            print_job(&job_id, &job);
            println!();
            println!("Follow it with 'stock-sync watch {}'", job_id);
        }
        _ => {
            println!("No sync is running.");
            println!("Run 'stock-sync start' to start one.");
        }
    }

    Ok(())
}
