/// Configuration constants for the application
pub struct Config;

impl Config {
    /// Enable automatic data refresh polling
    pub const ENABLE_AUTO_REFRESH: bool = true;

    /// Full-refresh polling interval in milliseconds (30 seconds)
    pub const POLLING_INTERVAL_MS: u32 = 30_000;

    /// Performance chart refresh interval in milliseconds (5 minutes)
    pub const PERFORMANCE_INTERVAL_MS: u32 = 300_000;

    /// History window requested for the performance charts
    pub const PERFORMANCE_WINDOW_HOURS: u32 = 24;

    /// Delay before the first reconnect attempt; doubles on every further attempt
    pub const RECONNECT_BASE_DELAY_MS: u32 = 1_000;

    /// Automatic reconnect attempts before giving up on the push channel
    pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

    /// Minimum spacing between rendered real-time updates
    pub const UPDATE_THROTTLE_MS: u32 = 500;

    /// Coalescing window of the operator log
    pub const LOG_FLUSH_WINDOW_MS: u32 = 100;

    /// Operator log lines kept before the oldest are evicted
    pub const LOG_RETENTION: usize = 100;
}
