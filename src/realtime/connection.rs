use super::state::{ConnectionState, Liveness, ReconnectPolicy};
use crate::models::{error::AppError, logs::LogLevel, metrics::MetricEvent};

/// Transport behind the push channel.
///
/// `connect` only starts the handshake; its outcome comes back through
/// [`ConnectionManager::handle_opened`] or [`ConnectionManager::handle_closed`].
/// `disconnect` must not report the closure it causes.
pub trait PushChannel {
    fn connect(&mut self) -> Result<(), AppError>;
    fn disconnect(&mut self);
}

/// One-shot timer for reconnect backoff. Expiry is reported through
/// [`ConnectionManager::handle_retry_due`].
pub trait RetryTimer {
    fn schedule(&mut self, delay_ms: u32);
    fn cancel(&mut self);
}

/// Presentation hooks for connection changes.
pub trait ConnectionObserver {
    fn state_changed(&self, state: ConnectionState);
    fn log(&self, level: LogLevel, message: String);
}

/// Owns the push channel and decides when to reconnect.
///
/// Every state transition writes the shared [`Liveness`] flag exactly once
/// and produces at most one log line.
pub struct ConnectionManager<C, T, O> {
    channel: C,
    timer: T,
    observer: O,
    policy: ReconnectPolicy,
    state: ConnectionState,
    liveness: Liveness,
}

impl<C, T, O> ConnectionManager<C, T, O>
where
    C: PushChannel,
    T: RetryTimer,
    O: ConnectionObserver,
{
    pub fn new(channel: C, timer: T, observer: O, policy: ReconnectPolicy, liveness: Liveness) -> Self {
        liveness.set(false);
        Self {
            channel,
            timer,
            observer,
            policy,
            state: ConnectionState::Disconnected,
            liveness,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Operator-requested connect. A no-op while connected or connecting.
    pub fn open(&mut self) {
        match self.state {
            ConnectionState::Connected | ConnectionState::Connecting => return,
            ConnectionState::Reconnecting => self.timer.cancel(),
            ConnectionState::Disconnected | ConnectionState::GivenUp => self.policy.reset(),
        }
        self.connect();
    }

    /// Tears the channel down. A user-initiated close also suppresses any
    /// automatic reconnect until the next [`open`](Self::open).
    pub fn close(&mut self, user_initiated: bool) {
        if user_initiated {
            self.policy.exhaust();
        }
        self.timer.cancel();
        self.channel.disconnect();

        if self.state == ConnectionState::Disconnected {
            self.liveness.set(false);
        } else {
            self.transition(
                ConnectionState::Disconnected,
                Some((LogLevel::Warn, "Real-time connection closed".to_string())),
            );
        }
    }

    pub fn handle_opened(&mut self) {
        if self.state != ConnectionState::Connecting {
            return;
        }
        self.policy.reset();
        self.transition(
            ConnectionState::Connected,
            Some((LogLevel::Info, "Real-time connection established".to_string())),
        );
    }

    /// Parses an inbound frame. Malformed frames are logged and dropped
    /// without affecting the connection.
    pub fn handle_message(&mut self, raw: &str) -> Option<MetricEvent> {
        if self.state != ConnectionState::Connected {
            return None;
        }
        match MetricEvent::parse(raw) {
            Ok(event) => Some(event),
            Err(e) => {
                self.observer
                    .log(LogLevel::Warn, format!("Dropped real-time update: {e}"));
                None
            }
        }
    }

    /// Transport error event. The closure that follows drives recovery.
    pub fn handle_error(&mut self) {
        if matches!(
            self.state,
            ConnectionState::Connecting | ConnectionState::Connected
        ) {
            self.observer.log(LogLevel::Error, "WebSocket error".to_string());
        }
    }

    /// Closure not requested by [`close`](Self::close): server, network or a
    /// failed handshake.
    pub fn handle_closed(&mut self) {
        if !matches!(
            self.state,
            ConnectionState::Connecting | ConnectionState::Connected
        ) {
            return;
        }
        self.channel.disconnect();

        match self.policy.advance() {
            Some(delay_ms) => {
                let message = format!(
                    "Real-time connection lost, retrying in {delay_ms}ms (attempt {}/{})",
                    self.policy.attempt(),
                    self.policy.max_attempts()
                );
                self.transition(ConnectionState::Reconnecting, Some((LogLevel::Warn, message)));
                self.timer.schedule(delay_ms);
            }
            None => {
                let message = format!(
                    "Real-time connection lost after {} reconnect attempts, falling back to polling",
                    self.policy.max_attempts()
                );
                self.transition(ConnectionState::GivenUp, Some((LogLevel::Error, message)));
            }
        }
    }

    pub fn handle_retry_due(&mut self) {
        if self.state == ConnectionState::Reconnecting {
            self.connect();
        }
    }

    fn connect(&mut self) {
        self.transition(ConnectionState::Connecting, None);
        if let Err(e) = self.channel.connect() {
            self.observer
                .log(LogLevel::Error, format!("Failed to open real-time channel: {e}"));
            self.handle_closed();
        }
    }

    fn transition(&mut self, next: ConnectionState, log: Option<(LogLevel, String)>) {
        self.state = next;
        self.liveness.set(next.is_live());
        self.observer.state_changed(next);
        if let Some((level, message)) = log {
            self.observer.log(level, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metrics::RealtimeMetrics;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeChannel {
        connects: usize,
        disconnects: usize,
        fail: bool,
    }

    impl PushChannel for FakeChannel {
        fn connect(&mut self) -> Result<(), AppError> {
            self.connects += 1;
            if self.fail {
                Err(AppError::ChannelError("refused".to_string()))
            } else {
                Ok(())
            }
        }

        fn disconnect(&mut self) {
            self.disconnects += 1;
        }
    }

    #[derive(Default)]
    struct FakeTimer {
        scheduled: Vec<u32>,
        pending: Option<u32>,
        cancels: usize,
    }

    impl RetryTimer for FakeTimer {
        fn schedule(&mut self, delay_ms: u32) {
            self.scheduled.push(delay_ms);
            self.pending = Some(delay_ms);
        }

        fn cancel(&mut self) {
            if self.pending.take().is_some() {
                self.cancels += 1;
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        states: RefCell<Vec<ConnectionState>>,
        logs: RefCell<Vec<(LogLevel, String)>>,
    }

    impl ConnectionObserver for Recorder {
        fn state_changed(&self, state: ConnectionState) {
            self.states.borrow_mut().push(state);
        }

        fn log(&self, level: LogLevel, message: String) {
            self.logs.borrow_mut().push((level, message));
        }
    }

    type TestManager = ConnectionManager<FakeChannel, FakeTimer, Recorder>;

    fn manager(max_attempts: u32) -> TestManager {
        ConnectionManager::new(
            FakeChannel::default(),
            FakeTimer::default(),
            Recorder::default(),
            ReconnectPolicy::new(max_attempts, 1000),
            Liveness::default(),
        )
    }

    fn connected(max_attempts: u32) -> TestManager {
        let mut m = manager(max_attempts);
        m.open();
        m.handle_opened();
        m
    }

    #[test]
    fn test_open_passes_through_connecting() {
        let mut m = manager(5);
        m.open();
        assert_eq!(m.state(), ConnectionState::Connecting);
        assert!(!m.liveness().is_live());

        m.handle_opened();
        assert_eq!(m.state(), ConnectionState::Connected);
        assert!(m.liveness().is_live());
        assert_eq!(
            *m.observer().states.borrow(),
            vec![ConnectionState::Connecting, ConnectionState::Connected]
        );
        let logs = m.observer().logs.borrow();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].0, LogLevel::Info);
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut m = manager(5);
        m.open();
        m.open();
        assert_eq!(m.channel().connects, 1);

        m.handle_opened();
        m.open();
        assert_eq!(m.channel().connects, 1);
        assert_eq!(m.state(), ConnectionState::Connected);
    }

    #[test]
    fn test_three_drops_back_off_exponentially() {
        let mut m = connected(5);

        m.handle_closed();
        for _ in 0..2 {
            m.handle_retry_due();
            assert_eq!(m.state(), ConnectionState::Connecting);
            m.handle_closed();
        }

        assert_eq!(m.policy().attempt(), 3);
        assert_eq!(m.timer().scheduled, vec![1000, 2000, 4000]);
        assert_eq!(m.timer().pending, Some(4000));
        assert_eq!(m.state(), ConnectionState::Reconnecting);
        assert!(!m.liveness().is_live());
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let mut m = connected(2);

        m.handle_closed();
        m.handle_retry_due();
        m.handle_closed();
        m.handle_retry_due();
        m.handle_closed();

        assert_eq!(m.state(), ConnectionState::GivenUp);
        assert_eq!(m.timer().scheduled, vec![1000, 2000]);
        let logs = m.observer().logs.borrow();
        assert_eq!(logs.last().map(|(level, _)| *level), Some(LogLevel::Error));
        drop(logs);

        // no automatic recovery
        m.handle_retry_due();
        assert_eq!(m.state(), ConnectionState::GivenUp);
        assert_eq!(m.channel().connects, 3);
    }

    #[test]
    fn test_manual_open_recovers_from_given_up() {
        let mut m = connected(1);
        m.handle_closed();
        m.handle_retry_due();
        m.handle_closed();
        assert_eq!(m.state(), ConnectionState::GivenUp);

        m.open();
        assert_eq!(m.state(), ConnectionState::Connecting);
        assert_eq!(m.policy().attempt(), 0);
    }

    #[test]
    fn test_successful_reopen_resets_attempts() {
        let mut m = connected(5);
        m.handle_closed();
        m.handle_retry_due();
        m.handle_opened();

        assert_eq!(m.policy().attempt(), 0);
        m.handle_closed();
        assert_eq!(m.timer().scheduled, vec![1000, 1000]);
    }

    #[test]
    fn test_user_close_while_reconnecting_cancels_retry() {
        let mut m = connected(5);
        m.handle_closed();
        assert_eq!(m.state(), ConnectionState::Reconnecting);

        m.close(true);
        assert_eq!(m.state(), ConnectionState::Disconnected);
        assert_eq!(m.timer().cancels, 1);
        assert_eq!(m.timer().pending, None);
        assert!(m.policy().is_exhausted());

        // a retry that fired anyway is ignored
        m.handle_retry_due();
        assert_eq!(m.state(), ConnectionState::Disconnected);
        assert_eq!(m.channel().connects, 1);
    }

    #[test]
    fn test_close_clears_liveness_and_ignores_late_close_event() {
        let mut m = connected(5);
        assert!(m.liveness().is_live());

        m.close(true);
        assert!(!m.liveness().is_live());

        m.handle_closed();
        assert_eq!(m.state(), ConnectionState::Disconnected);
        assert!(m.timer().scheduled.is_empty());
    }

    #[test]
    fn test_malformed_frame_keeps_connection() {
        let mut m = connected(5);
        assert!(m.handle_message("{{garbage").is_none());
        assert_eq!(m.state(), ConnectionState::Connected);
        assert!(m.liveness().is_live());
        assert_eq!(m.observer().logs.borrow().len(), 2);

        let event = m.handle_message(r#"{"type":"metrics_update","data":{"cpu_usage":5.0}}"#);
        assert_eq!(
            event,
            Some(MetricEvent::MetricsUpdate(RealtimeMetrics {
                cpu_usage: 5.0,
                ..Default::default()
            }))
        );
    }

    #[test]
    fn test_connect_failure_schedules_retry() {
        let mut m = manager(5);
        m.channel.fail = true;
        m.open();

        assert_eq!(m.state(), ConnectionState::Reconnecting);
        assert_eq!(m.timer().scheduled, vec![1000]);
    }

    #[test]
    fn test_every_transition_logs_at_most_once() {
        let mut m = connected(1);
        m.handle_closed();
        m.handle_retry_due();
        m.handle_closed();
        m.open();
        m.close(true);

        let states = m.observer().states.borrow().len();
        let logs = m.observer().logs.borrow().len();
        assert!(logs <= states);
    }
}
