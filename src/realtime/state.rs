use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Lifecycle of the push channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
    GivenUp,
}

impl ConnectionState {
    pub fn is_live(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    /// Label of the connection indicator.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Connected => "Connected",
            ConnectionState::Reconnecting => "Reconnecting",
            ConnectionState::GivenUp => "Offline",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Reconnecting => "reconnecting",
            ConnectionState::GivenUp => "given-up",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Exponential reconnect backoff: the delay before retry `k` (1-based) is
/// `base_delay_ms * 2^(k-1)`, and no retry happens once `attempt` has
/// reached `max_attempts`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    attempt: u32,
    max_attempts: u32,
    base_delay_ms: u32,
}

impl ReconnectPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts,
            base_delay_ms,
        }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay_ms(&self) -> u32 {
        self.base_delay_ms
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }

    /// Delay for the next retry, or `None` once retries are exhausted.
    pub fn next_delay_ms(&self) -> Option<u32> {
        if self.is_exhausted() {
            return None;
        }
        let factor = 1u32.checked_shl(self.attempt).unwrap_or(u32::MAX);
        Some(self.base_delay_ms.saturating_mul(factor))
    }

    /// Consumes one retry and returns its delay.
    pub fn advance(&mut self) -> Option<u32> {
        let delay = self.next_delay_ms()?;
        self.attempt += 1;
        Some(delay)
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Suppresses automatic reconnects until the next reset.
    pub fn exhaust(&mut self) {
        self.attempt = self.max_attempts;
    }
}

/// Shared "push channel is live" flag.
///
/// Only the connection manager writes it; the poll scheduler and the UI
/// read it. Clones share the same cell.
#[derive(Clone, Debug, Default)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    pub fn is_live(&self) -> bool {
        self.0.get()
    }

    pub(crate) fn set(&self, live: bool) {
        self.0.set(live);
    }
}

impl PartialEq for Liveness {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
