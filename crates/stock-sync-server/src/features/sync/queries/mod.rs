pub mod get_active;
pub mod get_progress;
pub mod list_logs;

pub use get_active::{ActiveSyncResponse, GetActiveQuery};
pub use get_progress::GetProgressQuery;
pub use list_logs::ListLogsQuery;
