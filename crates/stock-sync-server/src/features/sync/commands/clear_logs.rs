//! Clear logs command

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::jobs::StoreError;
use crate::service::SyncService;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClearLogsCommand;

impl Request<Result<(), StoreError>> for ClearLogsCommand {}

#[tracing::instrument(skip(service))]
pub async fn handle(service: SyncService, _command: ClearLogsCommand) -> Result<(), StoreError> {
    service.clear_logs().await
}
