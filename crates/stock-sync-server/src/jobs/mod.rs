//! Transient job state: the key-value store seam, the job tracker and the
//! run history

pub mod log;
pub mod store;
pub mod tracker;

pub use log::SyncLog;
pub use store::{MemoryStateStore, SqliteStateStore, StateStore, StoreError};
pub use tracker::{SyncJobTracker, TrackerError};
