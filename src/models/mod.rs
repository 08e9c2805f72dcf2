pub mod cluster;
pub mod error;
pub mod logs;
pub mod metrics;
