//! Feature modules implementing the stock sync API
//!
//! Each feature is a vertical slice following the CQRS (Command Query
//! Responsibility Segregation) split:
//!
//! - `commands/` - write operations (start a sync, clear the history)
//! - `queries/` - read operations (progress, active job, history)
//! - `routes.rs` - HTTP route definitions
//!
//! Commands and queries implement the mediator `Request` trait and expose a
//! standalone async `handle` function.

pub mod sync;

use axum::Router;

use crate::service::SyncService;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    pub service: SyncService,
}

/// Creates the API router with all feature routes mounted
///
/// - `/sync` - sync jobs, active job and run history
pub fn router(state: FeatureState) -> Router<()> {
    Router::new().nest("/sync", sync::sync_routes().with_state(state.service))
}
