//! `stock-sync progress` command implementation

use crate::api::ApiClient;
use crate::error::Result;
use crate::output::print_job;

/// Print one snapshot of a job
pub async fn run(server_url: String, job_id: String) -> Result<()> {
    let client = ApiClient::new(server_url)?;

    let job = client.get_progress(&job_id).await?;
    print_job(&job_id, &job);

    Ok(())
}
