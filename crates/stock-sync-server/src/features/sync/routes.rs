//! Sync API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/sync/jobs` - Start a sync run
//! - `GET /api/v1/sync/jobs/:job_id` - Progress snapshot of a run
//! - `GET /api/v1/sync/active` - The run currently holding the claim, if any
//! - `GET /api/v1/sync/logs` - Run history, oldest first
//! - `DELETE /api/v1/sync/logs` - Clear the run history
//!
//! # Examples
//!
//! ```rust,ignore
//! use axum::Router;
//! use stock_sync_server::features::sync::sync_routes;
//!
//! let app = Router::new().nest("/api/v1/sync", sync_routes().with_state(service));
//! ```

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::{
    commands::{ClearLogsCommand, StartStatus, StartSyncCommand},
    queries::{GetActiveQuery, GetProgressQuery, ListLogsQuery},
};
use crate::api::response::ApiResponse;
use crate::error::{ApiResult, AppError};
use crate::jobs::log::SYNC_LOG_CAPACITY;
use crate::service::SyncService;

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the sync router with all routes configured
pub fn sync_routes() -> Router<SyncService> {
    Router::new()
        .route("/jobs", post(start_sync))
        .route("/jobs/:job_id", get(get_progress))
        .route("/active", get(get_active))
        .route("/logs", get(list_logs).delete(clear_logs))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Start a sync run
///
/// # Request Body
///
/// ```json
/// { "scheduled": false }
/// ```
///
/// An empty body starts a manual run.
///
/// # Response
///
/// - `202 Accepted` - Run started; poll `GET /jobs/:job_id`
/// - `200 OK` - Scheduled trigger skipped; `job_id` is the active run
/// - `400 Bad Request` - Body is not a valid start command
/// - `409 Conflict` - Another run is active (`details.active_sync_id`)
#[tracing::instrument(skip(service, body))]
async fn start_sync(State(service): State<SyncService>, body: Bytes) -> ApiResult<Response> {
    let command = parse_start_body(&body)?;
    let response = super::commands::start_sync::handle(service, command).await?;

    let status = match response.status {
        StartStatus::Started => {
            tracing::info!(job_id = %response.job_id, "Sync started via API");
            StatusCode::ACCEPTED
        }
        StartStatus::Skipped => StatusCode::OK,
    };

    Ok(ApiResponse::success(response).with_status(status))
}

fn parse_start_body(body: &[u8]) -> Result<StartSyncCommand, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StartSyncCommand::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid start request: {}", e)))
}

/// Clear the run history
///
/// # Response
///
/// - `204 No Content`
#[tracing::instrument(skip(service))]
async fn clear_logs(State(service): State<SyncService>) -> ApiResult<StatusCode> {
    super::commands::clear_logs::handle(service, ClearLogsCommand).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// Progress snapshot of one run
///
/// # Response
///
/// - `200 OK` - Snapshot
/// - `404 Not Found` - Unknown or expired job
#[tracing::instrument(skip(service))]
async fn get_progress(
    State(service): State<SyncService>,
    Path(job_id): Path<String>,
) -> ApiResult<Response> {
    let job = super::queries::get_progress::handle(service, GetProgressQuery { job_id }).await?;
    Ok(ApiResponse::success(job).into_response())
}

/// The run currently holding the claim
#[tracing::instrument(skip(service))]
async fn get_active(State(service): State<SyncService>) -> ApiResult<Response> {
    let response = super::queries::get_active::handle(service, GetActiveQuery).await?;
    Ok(ApiResponse::success(response).into_response())
}

/// Run history, oldest first
#[tracing::instrument(skip(service))]
async fn list_logs(State(service): State<SyncService>) -> ApiResult<Response> {
    let entries = super::queries::list_logs::handle(service, ListLogsQuery).await?;

    let meta = json!({
        "count": entries.len(),
        "capacity": SYNC_LOG_CAPACITY,
    });

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(entries, meta))).into_response())
}
