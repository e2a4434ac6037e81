//! HTTP application assembly

pub mod response;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::compression::CompressionLayer;

use crate::config::CorsConfig;
use crate::features;
use crate::middleware;
use crate::service::SyncService;

/// Full router: health endpoints, `/api/v1` features and the middleware stack
pub fn create_router(service: SyncService, cors: &CorsConfig) -> Router {
    let feature_routes = features::router(features::FeatureState {
        service: service.clone(),
    });

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .with_state(service)
        .nest("/api/v1", feature_routes)
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(cors))
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Stock Sync Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// Liveness plus a state store round trip
async fn health_check(State(service): State<SyncService>) -> Result<Response, StatusCode> {
    match service.get_active().await {
        Ok(active) => Ok((
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "state_store": "connected",
                "sync_active": active.is_some()
            })),
        )
            .into_response()),
        Err(e) => {
            tracing::error!("State store health check failed: {:?}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
