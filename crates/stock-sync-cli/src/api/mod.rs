//! API client module
//!
//! HTTP client for the stock sync server's trigger surface.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::ApiClient;
pub use types::*;
