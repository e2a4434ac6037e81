//! Get progress query
//!
//! Latest snapshot of one job. Snapshots outlive their job by a short grace
//! period, after which the job is reported as not found.

use mediator::Request;
use serde::{Deserialize, Serialize};
use stock_sync_common::{JobId, SyncJob};

use crate::jobs::TrackerError;
use crate::service::SyncService;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProgressQuery {
    pub job_id: JobId,
}

impl Request<Result<SyncJob, TrackerError>> for GetProgressQuery {}

#[tracing::instrument(skip(service))]
pub async fn handle(service: SyncService, query: GetProgressQuery) -> Result<SyncJob, TrackerError> {
    service.get_progress(&query.job_id).await
}
