//! Stock sync feature
//!
//! Starts reconciliation runs, reports their progress and exposes the
//! bounded run history.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::sync_routes;
