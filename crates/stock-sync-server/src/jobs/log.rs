//! Bounded history of finished runs

use std::sync::Arc;
use stock_sync_common::LogEntry;
use tokio::sync::Mutex;

use super::store::{self, StateStore, StoreError};

/// Key of the stored history
pub const SYNC_LOG_KEY: &str = "sync_log";

/// Entries kept before the oldest is evicted
pub const SYNC_LOG_CAPACITY: usize = 10;

/// Fixed-capacity list of [`LogEntry`] values in insertion order
#[derive(Clone)]
pub struct SyncLog {
    store: Arc<dyn StateStore>,
    capacity: usize,
    write_lock: Arc<Mutex<()>>,
}

impl SyncLog {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self::with_capacity(store, SYNC_LOG_CAPACITY)
    }

    pub fn with_capacity(store: Arc<dyn StateStore>, capacity: usize) -> Self {
        Self {
            store,
            capacity: capacity.max(1),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Append `entry`, evicting from the front once over capacity
    pub async fn append(&self, entry: LogEntry) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.all().await?;
        entries.push(entry);
        if entries.len() > self.capacity {
            let excess = entries.len() - self.capacity;
            entries.drain(..excess);
        }

        store::save(self.store.as_ref(), SYNC_LOG_KEY, &entries, None).await
    }

    /// Oldest first
    pub async fn all(&self) -> Result<Vec<LogEntry>, StoreError> {
        Ok(store::load(self.store.as_ref(), SYNC_LOG_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.store.delete(SYNC_LOG_KEY).await
    }
}
