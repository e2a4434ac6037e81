//! API request and response types
//!
//! Matches the server's JSON envelopes. Job snapshots and log entries reuse the
//! shared types from `stock-sync-common`.

use serde::{Deserialize, Serialize};
use stock_sync_common::{JobId, SyncJob};

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiErrorDetail {
    /// `details.active_sync_id` of a `sync_in_progress` error
    pub fn active_sync_id(&self) -> Option<JobId> {
        self.details
            .as_ref()?
            .get("active_sync_id")?
            .as_str()
            .map(str::to_string)
    }
}

/// Request body of `POST /api/v1/sync/jobs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartSyncRequest {
    pub scheduled: bool,
}

/// Response of `POST /api/v1/sync/jobs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSyncResponse {
    pub job_id: JobId,
    /// `started`, or `skipped` for a scheduled trigger
    pub status: String,
}

/// Response of `GET /api/v1/sync/active`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSync {
    pub active: bool,
    #[serde(default)]
    pub sync_id: Option<JobId>,
    #[serde(default)]
    pub progress: Option<SyncJob>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_conflict_details_expose_active_id() {
        let body: ApiErrorResponse = serde_json::from_value(json!({
            "success": false,
            "error": {
                "code": "sync_in_progress",
                "message": "A sync is already running",
                "details": { "active_sync_id": "sync_abc" }
            }
        }))
        .unwrap();

        assert_eq!(body.error.active_sync_id(), Some("sync_abc".to_string()));
    }

    #[test]
    fn test_idle_active_response() {
        let active: ActiveSync = serde_json::from_value(json!({ "active": false })).unwrap();
        assert!(!active.active);
        assert!(active.sync_id.is_none());
        assert!(active.progress.is_none());
    }
}
