//! HTTP API client for the stock sync server
//!
//! Provides methods to start jobs and read progress and history.

use crate::api::{endpoints, types::*};
use crate::error::{CliError, Result};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use stock_sync_common::{LogEntry, SyncJob};

// ============================================================================
// API Client Constants
// ============================================================================

/// Default timeout for API requests in seconds.
/// Can be overridden via STOCK_SYNC_API_TIMEOUT_SECS environment variable.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Default server URL when not specified via flag or environment variable.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// API client for the stock sync server
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let timeout_secs = std::env::var("STOCK_SYNC_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS);

        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(CliError::config("server URL is empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("STOCK_SYNC_SERVER_URL")
            .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());

        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check server health
    pub async fn health_check(&self) -> Result<bool> {
        let url = endpoints::health_url(&self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Start a manual sync run
    ///
    /// A `409` becomes [`CliError::SyncInProgress`] carrying the active job.
    pub async fn start_sync(&self) -> Result<StartSyncResponse> {
        let url = endpoints::sync_jobs_url(&self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&StartSyncRequest::default())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let api_response: ApiResponse<StartSyncResponse> = response.json().await?;
        Ok(api_response.data)
    }

    /// Progress snapshot of one job
    pub async fn get_progress(&self, job_id: &str) -> Result<SyncJob> {
        let url = endpoints::sync_job_url(&self.base_url, job_id);

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CliError::JobNotFound(job_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let api_response: ApiResponse<SyncJob> = response.json().await?;
        Ok(api_response.data)
    }

    /// The job currently holding the claim
    pub async fn get_active(&self) -> Result<ActiveSync> {
        let url = endpoints::active_url(&self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let api_response: ApiResponse<ActiveSync> = response.json().await?;
        Ok(api_response.data)
    }

    /// Run history, oldest first
    pub async fn list_logs(&self) -> Result<Vec<LogEntry>> {
        let url = endpoints::logs_url(&self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let api_response: ApiResponse<Vec<LogEntry>> = response.json().await?;
        Ok(api_response.data)
    }

    /// Remove every history entry
    pub async fn clear_logs(&self) -> Result<()> {
        let url = endpoints::logs_url(&self.base_url);

        let response = self.client.delete(&url).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }
}

/// Map a non-2xx response onto a [`CliError`]
async fn error_from_response(response: Response) -> CliError {
    let status = response.status();

    match response.json::<ApiErrorResponse>().await {
        Ok(body) => {
            if status == StatusCode::CONFLICT {
                if let Some(active_job_id) = body.error.active_sync_id() {
                    return CliError::SyncInProgress { active_job_id };
                }
            }
            CliError::api(format!("{} ({})", body.error.message, status))
        }
        Err(_) => CliError::api(format!("unexpected response status {}", status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_empty_server_url_is_rejected() {
        assert!(matches!(ApiClient::new("  "), Err(CliError::Config(_))));
    }

    #[tokio::test]
    async fn test_start_conflict_maps_to_sync_in_progress() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/sync/jobs"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "success": false,
                "error": {
                    "code": "sync_in_progress",
                    "message": "A sync is already running",
                    "details": { "active_sync_id": "sync_running" }
                }
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        match client.start_sync().await {
            Err(CliError::SyncInProgress { active_job_id }) => {
                assert_eq!(active_job_id, "sync_running")
            }
            other => panic!("expected conflict, got {:?}", other.map(|r| r.job_id)),
        }
    }

    #[tokio::test]
    async fn test_missing_progress_maps_to_job_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/sync/jobs/sync_gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "error": { "code": "not_found", "message": "Progress not found" }
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        assert!(matches!(
            client.get_progress("sync_gone").await,
            Err(CliError::JobNotFound(id)) if id == "sync_gone"
        ));
    }

    #[tokio::test]
    async fn test_server_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/sync/logs"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "success": false,
                "error": { "code": "internal_error", "message": "An internal error occurred" }
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let err = client.list_logs().await.unwrap_err();
        assert!(err.to_string().contains("An internal error occurred"));
    }

    #[tokio::test]
    async fn test_health_check_against_unreachable_server() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        assert!(!client.health_check().await.unwrap());
    }
}
