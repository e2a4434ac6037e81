//! Stock Sync Common Library
//!
//! Shared types, error taxonomy, and logging for the stock sync workspace.
//!
//! # Overview
//!
//! This crate provides functionality used by both the server and the CLI:
//!
//! - **Error Handling**: [`SyncError`], the run-terminating failure taxonomy
//! - **Types**: job snapshots, partial updates, log entries and stock status
//! - **Logging**: `tracing` subscriber setup driven by environment variables
//!
//! # Example
//!
//! ```no_run
//! use stock_sync_common::types::{JobStatus, SyncJob};
//!
//! let job = SyncJob::new("sync_1", false);
//! assert_eq!(job.status, JobStatus::Init);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SyncError};
pub use types::{JobId, JobStatus, JobStep, LogEntry, StockStatus, SyncJob, SyncJobUpdate};
