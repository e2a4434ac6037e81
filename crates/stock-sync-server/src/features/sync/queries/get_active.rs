//! Get active sync query
//!
//! Lets a client that lost track of its job (page reload, new terminal)
//! find the running one and resume polling.

use mediator::Request;
use serde::{Deserialize, Serialize};
use stock_sync_common::{JobId, SyncJob};

use crate::jobs::TrackerError;
use crate::service::SyncService;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetActiveQuery;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSyncResponse {
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_id: Option<JobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<SyncJob>,
}

impl Request<Result<ActiveSyncResponse, TrackerError>> for GetActiveQuery {}

#[tracing::instrument(skip(service))]
pub async fn handle(
    service: SyncService,
    _query: GetActiveQuery,
) -> Result<ActiveSyncResponse, TrackerError> {
    let response = match service.get_active().await? {
        Some((job_id, job)) => ActiveSyncResponse {
            active: true,
            sync_id: Some(job_id),
            progress: Some(job),
        },
        None => ActiveSyncResponse {
            active: false,
            sync_id: None,
            progress: None,
        },
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_response_omits_job_fields() {
        let response = ActiveSyncResponse {
            active: false,
            sync_id: None,
            progress: None,
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"active": false})
        );
    }
}
