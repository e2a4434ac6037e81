//! List logs query
//!
//! Run history in insertion order (oldest first); clients reverse it for
//! display.

use mediator::Request;
use serde::{Deserialize, Serialize};
use stock_sync_common::LogEntry;

use crate::jobs::StoreError;
use crate::service::SyncService;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListLogsQuery;

impl Request<Result<Vec<LogEntry>, StoreError>> for ListLogsQuery {}

#[tracing::instrument(skip(service))]
pub async fn handle(service: SyncService, _query: ListLogsQuery) -> Result<Vec<LogEntry>, StoreError> {
    service.logs().await
}
