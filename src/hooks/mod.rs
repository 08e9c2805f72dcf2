pub mod use_cluster;
pub mod use_logs;
pub mod use_performance;
pub mod use_realtime;

pub use use_cluster::{ClusterHandle, use_cluster};
pub use use_logs::{LogHandle, LogsHandle, use_logs};
pub use use_performance::use_performance;
pub use use_realtime::{RealtimeHandle, use_realtime};
