//! Start sync command
//!
//! Claims the single-flight slot and launches a reconciliation run in the
//! background. The caller gets the job id immediately and polls for progress.

use mediator::Request;
use serde::{Deserialize, Serialize};
use stock_sync_common::JobId;

use crate::service::{StartOutcome, StartSyncError, SyncService};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartSyncCommand {
    /// Scheduled triggers are skipped instead of rejected while a job runs
    #[serde(default)]
    pub scheduled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartStatus {
    Started,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSyncResponse {
    /// The new job, or the active one when skipped
    pub job_id: JobId,
    pub status: StartStatus,
}

impl Request<Result<StartSyncResponse, StartSyncError>> for StartSyncCommand {}

#[tracing::instrument(skip(service))]
pub async fn handle(
    service: SyncService,
    command: StartSyncCommand,
) -> Result<StartSyncResponse, StartSyncError> {
    let response = match service.start_sync(command.scheduled).await? {
        StartOutcome::Started(job_id) => StartSyncResponse {
            job_id,
            status: StartStatus::Started,
        },
        StartOutcome::Skipped { active_job_id } => StartSyncResponse {
            job_id: active_job_id,
            status: StartStatus::Skipped,
        },
    };

    Ok(response)
}
