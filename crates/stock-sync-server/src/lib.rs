//! Stock Sync Server Library
//!
//! Reconciles product stock in a catalog against a remote CSV feed, as a
//! background job with pollable progress.
//!
//! # Overview
//!
//! - **Sync pipeline** ([`sync`]): fetch the feed, sniff and parse it, index
//!   the catalog by SKU and apply quantities in batches
//! - **Job state** ([`jobs`]): single-flight claim, merge-updated progress
//!   snapshots with expiry, bounded run history, all on a key-value store seam
//! - **Catalog** ([`catalog`]): the product store seam with in-memory and
//!   SQLite adapters
//! - **Trigger surface** ([`service`], [`scheduler`], [`features`]): start,
//!   poll and inspect runs over HTTP or on a fixed schedule
//!
//! # Architecture
//!
//! The HTTP surface follows a **CQRS** split: commands (start a sync, clear
//! the history) and queries (progress, active job, history) are mediator
//! requests with standalone async handlers. Every handler goes through
//! [`service::SyncService`], which owns the tracker, the run history and the
//! engine.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use stock_sync_server::{
//!     catalog::MemoryCatalog,
//!     jobs::MemoryStateStore,
//!     service::SyncService,
//!     sync::{EngineOptions, FeedConfiguration},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let catalog = Arc::new(MemoryCatalog::with_products([("A1", Some(0))]).await);
//!     let service = SyncService::new(
//!         catalog,
//!         Arc::new(MemoryStateStore::new()),
//!         FeedConfiguration::new("https://feeds.example.com/stock.csv"),
//!         EngineOptions::default(),
//!     );
//!
//!     let run = service.run_now(false).await?;
//!     println!("{}: {:?}", run.job_id, run.result);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod jobs;
pub mod middleware;
pub mod scheduler;
pub mod service;
pub mod sync;

// Re-export commonly used types
pub use error::{ApiResult, AppError};
pub use service::{StartOutcome, StartSyncError, SyncService};
