//! Test helpers for stock sync server integration tests
//!
//! This module provides utilities for:
//! - Mock feed servers
//! - In-memory and SQLite-backed services
//! - Polling a job until it finishes

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use stock_sync_common::SyncJob;
use stock_sync_server::{
    catalog::MemoryCatalog,
    config::DatabaseConfig,
    db,
    jobs::MemoryStateStore,
    service::SyncService,
    sync::{EngineOptions, FeedConfiguration},
};
use sqlx::SqlitePool;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const FEED_PATH: &str = "/stock.csv";

/// Mock server answering `GET /stock.csv` with `body`
pub async fn feed_server(body: &str) -> MockServer {
    feed_server_with(ResponseTemplate::new(200).set_body_string(body)).await
}

/// Mock server answering `GET /stock.csv` with a custom response
pub async fn feed_server_with(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FEED_PATH))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

pub fn feed_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), FEED_PATH)
}

/// Service over in-memory adapters reading the default `sku`/`stock` columns
pub fn memory_service(catalog: Arc<MemoryCatalog>, feed: FeedConfiguration) -> SyncService {
    SyncService::new(
        catalog,
        Arc::new(MemoryStateStore::new()),
        feed,
        EngineOptions::default(),
    )
}

/// Fresh migrated in-memory database
pub async fn sqlite_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        connect_timeout_secs: 5,
    };
    db::init(&config).await.expect("Failed to create test database")
}

/// Poll until the job reaches `complete` or `error`
pub async fn wait_until_terminal(service: &SyncService, job_id: &str) -> SyncJob {
    for _ in 0..200 {
        let job = service
            .get_progress(job_id)
            .await
            .expect("job snapshot should exist");
        if job.is_terminal() {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("job {} did not finish", job_id);
}
