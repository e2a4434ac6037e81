pub mod clear_logs;
pub mod start_sync;

pub use clear_logs::ClearLogsCommand;
pub use start_sync::{StartStatus, StartSyncCommand, StartSyncResponse};
