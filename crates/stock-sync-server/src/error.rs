//! Server error type and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use stock_sync_common::JobId;
use thiserror::Error;

use crate::api::response::ErrorResponse;
use crate::jobs::{StoreError, TrackerError};
use crate::service::StartSyncError;

/// Errors surfaced by HTTP handlers
#[derive(Error, Debug)]
pub enum AppError {
    #[error("A sync is already running")]
    SyncInProgress { active_sync_id: JobId },

    #[error("{0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("State store error: {0}")]
    Store(#[from] StoreError),
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::AlreadyRunning { active_job_id } => AppError::SyncInProgress {
                active_sync_id: active_job_id,
            },
            TrackerError::NotFound(_) => AppError::NotFound("Progress not found".to_string()),
            TrackerError::JobFinished(id) => {
                AppError::BadRequest(format!("Job {} already finished", id))
            }
            TrackerError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<StartSyncError> for AppError {
    fn from(err: StartSyncError) -> Self {
        match err {
            StartSyncError::AlreadyRunning { active_job_id } => AppError::SyncInProgress {
                active_sync_id: active_job_id,
            },
            StartSyncError::Claim(e) => e.into(),
        }
    }
}

impl AppError {
    /// Stable error code used in the JSON envelope
    pub fn code(&self) -> &'static str {
        match self {
            AppError::SyncInProgress { .. } => "sync_in_progress",
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Store(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, body) = match self {
            AppError::SyncInProgress { ref active_sync_id } => (
                StatusCode::CONFLICT,
                ErrorResponse::with_details(
                    code,
                    "A sync is already running",
                    json!({ "active_sync_id": active_sync_id }),
                ),
            ),
            AppError::NotFound(ref message) => {
                (StatusCode::NOT_FOUND, ErrorResponse::new(code, message.clone()))
            }
            AppError::BadRequest(ref message) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(code, message.clone()))
            }
            AppError::Store(ref e) => {
                tracing::error!("State store error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(code, "A state store error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Alias for Result with AppError
pub type ApiResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_maps_to_409() {
        let err: AppError = StartSyncError::AlreadyRunning {
            active_job_id: "sync_abc".to_string(),
        }
        .into();
        assert_eq!(err.code(), "sync_in_progress");
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_missing_progress_maps_to_404() {
        let err: AppError = TrackerError::NotFound("sync_missing".to_string()).into();
        assert_eq!(err.code(), "not_found");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_finished_job_maps_to_400() {
        let err: AppError = TrackerError::JobFinished("sync_done".to_string()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
