//! Integration tests for the HTTP surface
//!
//! These tests verify:
//! - Root and health endpoints
//! - Starting a sync and polling its progress
//! - Single-flight conflicts and scheduled skips
//! - Active job lookup and the run history endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use stock_sync_server::{api, catalog::MemoryCatalog, config::CorsConfig, sync::FeedConfiguration};
use tower::ServiceExt; // for `oneshot`
use wiremock::ResponseTemplate;

mod helpers;

use helpers::{feed_server, feed_server_with, feed_url, memory_service, wait_until_terminal};

fn cors() -> CorsConfig {
    CorsConfig {
        allowed_origins: vec!["*".to_string()],
        allow_credentials: false,
    }
}

async fn create_test_app(feed: FeedConfiguration) -> (Router, stock_sync_server::SyncService) {
    let catalog = Arc::new(MemoryCatalog::with_products([("A1", Some(0)), ("A2", Some(4))]).await);
    let service = memory_service(catalog, feed);
    (api::create_router(service.clone(), &cors()), service)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_root_endpoint() {
    let (app, _) = create_test_app(FeedConfiguration::default()).await;

    let (status, json) = send(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Stock Sync Server");
    assert_eq!(json["status"], "running");
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = create_test_app(FeedConfiguration::default()).await;

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["state_store"], "connected");
    assert_eq!(json["sync_active"], false);
}

#[tokio::test]
async fn test_start_sync_and_poll_progress() {
    let server = feed_server("sku,stock\nA1,7\nA2,0\nZZ,1\n").await;
    let (app, service) = create_test_app(FeedConfiguration::new(feed_url(&server))).await;

    let (status, json) = send(&app, "POST", "/api/v1/sync/jobs", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "started");
    let job_id = json["data"]["job_id"].as_str().unwrap().to_string();
    assert!(job_id.starts_with("sync_"));

    wait_until_terminal(&service, &job_id).await;

    let (status, json) = send(&app, "GET", &format!("/api/v1/sync/jobs/{}", job_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], job_id.as_str());
    assert_eq!(json["data"]["status"], "complete");
    assert_eq!(json["data"]["step"], "complete");
    assert_eq!(json["data"]["percent"], 100);
    assert_eq!(json["data"]["updated"], 2);
    assert_eq!(json["data"]["skipped"], 1);
    assert_eq!(json["data"]["is_scheduled"], false);
    assert_eq!(json["data"]["message"], "Stock sync completed. Updated: 2, Skipped: 1");
}

#[tokio::test]
async fn test_failed_run_reports_error_snapshot() {
    let server = feed_server("").await;
    let (app, service) = create_test_app(FeedConfiguration::new(feed_url(&server))).await;

    let (status, json) = send(&app, "POST", "/api/v1/sync/jobs", Some(json!({}))).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let job_id = json["data"]["job_id"].as_str().unwrap().to_string();

    wait_until_terminal(&service, &job_id).await;

    let (_, json) = send(&app, "GET", &format!("/api/v1/sync/jobs/{}", job_id), None).await;
    assert_eq!(json["data"]["status"], "error");
    assert_eq!(json["data"]["message"], "CSV file is empty.");

    let (_, json) = send(&app, "GET", "/api/v1/sync/logs", None).await;
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn test_second_start_conflicts_while_running() {
    let server = feed_server_with(
        ResponseTemplate::new(200)
            .set_body_string("sku,stock\nA1,1\n")
            .set_delay(Duration::from_millis(400)),
    )
    .await;
    let (app, service) = create_test_app(FeedConfiguration::new(feed_url(&server))).await;

    let (status, json) = send(&app, "POST", "/api/v1/sync/jobs", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let job_id = json["data"]["job_id"].as_str().unwrap().to_string();

    let (status, json) = send(&app, "POST", "/api/v1/sync/jobs", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "sync_in_progress");
    assert_eq!(json["error"]["details"]["active_sync_id"], job_id.as_str());

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/sync/jobs",
        Some(json!({ "scheduled": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "skipped");
    assert_eq!(json["data"]["job_id"], job_id.as_str());

    let (status, json) = send(&app, "GET", "/api/v1/sync/active", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["active"], true);
    assert_eq!(json["data"]["sync_id"], job_id.as_str());
    assert_eq!(json["data"]["progress"]["id"], job_id.as_str());
    assert_eq!(json["data"]["progress"]["is_scheduled"], false);

    let (_, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(json["sync_active"], true);

    wait_until_terminal(&service, &job_id).await;

    let (_, json) = send(&app, "GET", "/api/v1/sync/active", None).await;
    assert_eq!(json["data"], json!({ "active": false }));
}

#[tokio::test]
async fn test_malformed_start_body_is_rejected() {
    let (app, _) = create_test_app(FeedConfiguration::default()).await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/sync/jobs",
        Some(json!({ "scheduled": "yes" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "bad_request");

    // nothing was claimed
    let (_, json) = send(&app, "GET", "/api/v1/sync/active", None).await;
    assert_eq!(json["data"]["active"], false);
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let (app, _) = create_test_app(FeedConfiguration::default()).await;

    let (status, json) = send(&app, "GET", "/api/v1/sync/jobs/sync_doesnotexist", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["message"], "Progress not found");
}

#[tokio::test]
async fn test_logs_list_and_clear() {
    let server = feed_server("sku,stock\nA1,3\n").await;
    let (app, service) = create_test_app(FeedConfiguration::new(feed_url(&server))).await;

    service.run_now(false).await.unwrap().result.unwrap();
    service.run_now(false).await.unwrap().result.unwrap();

    let (status, json) = send(&app, "GET", "/api/v1/sync/logs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["count"], 2);
    assert_eq!(json["meta"]["capacity"], 10);
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["success"], true);
    assert_eq!(entries[0]["updated"], 1);
    assert_eq!(entries[0]["message"], "Stock sync completed. Updated: 1, Skipped: 0");

    let (status, _) = send(&app, "DELETE", "/api/v1/sync/logs", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, json) = send(&app, "GET", "/api/v1/sync/logs", None).await;
    assert_eq!(json["data"], json!([]));
    assert_eq!(json["meta"]["count"], 0);
}
