pub mod browser;
pub mod connection;
pub mod state;
pub mod throttle;

pub use browser::{RealtimeController, spawn_realtime};
pub use connection::{ConnectionManager, ConnectionObserver, PushChannel, RetryTimer};
pub use state::{ConnectionState, Liveness, ReconnectPolicy};
pub use throttle::{Submission, UpdateThrottle};
