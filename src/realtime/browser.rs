//! Browser bindings for the connection manager: a `WebSocket` transport,
//! `gloo` timers, and the single task that owns the manager.

use super::connection::{ConnectionManager, ConnectionObserver, PushChannel, RetryTimer};
use super::state::{Liveness, ReconnectPolicy};
use super::throttle::{Submission, UpdateThrottle};
use crate::config::Config;
use crate::models::{
    error::AppError,
    metrics::{MetricEvent, RealtimeMetrics},
};
use chrono::Utc;
use futures::StreamExt;
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

/// Everything the realtime task reacts to, in arrival order.
#[derive(Debug)]
enum Signal {
    Connect,
    Disconnect,
    Opened,
    Frame(String),
    Errored,
    Closed,
    RetryDue,
    RenderTick,
    Shutdown,
}

fn forward(signals: &UnboundedSender<Signal>, signal: Signal) {
    if let Err(e) = signals.unbounded_send(signal) {
        gloo::console::debug!(format!("Realtime task gone, dropped {:?}", e.into_inner()));
    }
}

struct SocketHandlers {
    on_open: Closure<dyn FnMut(Event)>,
    on_message: Closure<dyn FnMut(MessageEvent)>,
    on_error: Closure<dyn FnMut(Event)>,
    on_close: Closure<dyn FnMut(CloseEvent)>,
}

/// `WebSocket` transport that turns socket events into task signals.
struct WebSocketChannel {
    url: String,
    signals: UnboundedSender<Signal>,
    socket: Option<WebSocket>,
    handlers: Option<SocketHandlers>,
}

impl WebSocketChannel {
    fn new(url: String, signals: UnboundedSender<Signal>) -> Self {
        Self {
            url,
            signals,
            socket: None,
            handlers: None,
        }
    }

    fn event_handler(&self, signal: fn() -> Signal) -> Closure<dyn FnMut(Event)> {
        let signals = self.signals.clone();
        Closure::new(move |_: Event| forward(&signals, signal()))
    }
}

impl PushChannel for WebSocketChannel {
    fn connect(&mut self) -> Result<(), AppError> {
        self.disconnect();

        let socket = WebSocket::new(&self.url)
            .map_err(|e| AppError::ChannelError(format!("Cannot open {}: {e:?}", self.url)))?;

        let on_message = {
            let signals = self.signals.clone();
            Closure::new(move |event: MessageEvent| {
                if let Some(text) = event.data().as_string() {
                    forward(&signals, Signal::Frame(text));
                } else {
                    gloo::console::warn!("Ignoring non-text real-time frame");
                }
            })
        };
        let on_close = {
            let signals = self.signals.clone();
            Closure::new(move |event: CloseEvent| {
                gloo::console::debug!(format!(
                    "Real-time socket closed (code {}, reason {:?})",
                    event.code(),
                    event.reason()
                ));
                forward(&signals, Signal::Closed);
            })
        };
        let handlers = SocketHandlers {
            on_open: self.event_handler(|| Signal::Opened),
            on_message,
            on_error: self.event_handler(|| Signal::Errored),
            on_close,
        };

        socket.set_onopen(Some(handlers.on_open.as_ref().unchecked_ref()));
        socket.set_onmessage(Some(handlers.on_message.as_ref().unchecked_ref()));
        socket.set_onerror(Some(handlers.on_error.as_ref().unchecked_ref()));
        socket.set_onclose(Some(handlers.on_close.as_ref().unchecked_ref()));

        self.socket = Some(socket);
        self.handlers = Some(handlers);
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(socket) = self.socket.take() {
            // Detach first so our own close is not reported as a drop.
            socket.set_onopen(None);
            socket.set_onmessage(None);
            socket.set_onerror(None);
            socket.set_onclose(None);
            if let Err(e) = socket.close() {
                gloo::console::warn!(format!("Closing real-time socket failed: {e:?}"));
            }
        }
        self.handlers = None;
    }
}

/// Backoff timer on top of `gloo_timers`. Dropping the `Timeout` cancels it.
struct TimeoutRetry {
    signals: UnboundedSender<Signal>,
    pending: Option<Timeout>,
}

impl TimeoutRetry {
    fn new(signals: UnboundedSender<Signal>) -> Self {
        Self {
            signals,
            pending: None,
        }
    }
}

impl RetryTimer for TimeoutRetry {
    fn schedule(&mut self, delay_ms: u32) {
        let signals = self.signals.clone();
        self.pending = Some(Timeout::new(delay_ms, move || {
            forward(&signals, Signal::RetryDue);
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            drop(handle);
        }
    }
}

/// Handle to the realtime task. Cheap to clone; every call is queued behind
/// the socket events already received.
#[derive(Clone, Debug)]
pub struct RealtimeController {
    signals: UnboundedSender<Signal>,
}

impl RealtimeController {
    pub fn connect(&self) {
        forward(&self.signals, Signal::Connect);
    }

    pub fn disconnect(&self) {
        forward(&self.signals, Signal::Disconnect);
    }

    /// Closes the channel and ends the task.
    pub fn shutdown(&self) {
        forward(&self.signals, Signal::Shutdown);
    }
}

impl PartialEq for RealtimeController {
    fn eq(&self, other: &Self) -> bool {
        self.signals.same_receiver(&other.signals)
    }
}

/// Spawns the task that owns the [`ConnectionManager`] and the metrics
/// [`UpdateThrottle`]. Accepted updates reach `on_metrics` on the next
/// animation frame.
pub fn spawn_realtime<O, F>(
    url: String,
    observer: O,
    liveness: Liveness,
    on_metrics: F,
) -> RealtimeController
where
    O: ConnectionObserver + 'static,
    F: Fn(RealtimeMetrics) + 'static,
{
    let (signals, inbox) = unbounded();

    let manager = ConnectionManager::new(
        WebSocketChannel::new(url, signals.clone()),
        TimeoutRetry::new(signals.clone()),
        observer,
        ReconnectPolicy::new(Config::MAX_RECONNECT_ATTEMPTS, Config::RECONNECT_BASE_DELAY_MS),
        liveness,
    );
    spawn_local(run(manager, inbox, signals.clone(), on_metrics));

    RealtimeController { signals }
}

async fn run<O, F>(
    mut manager: ConnectionManager<WebSocketChannel, TimeoutRetry, O>,
    mut inbox: UnboundedReceiver<Signal>,
    signals: UnboundedSender<Signal>,
    on_metrics: F,
) where
    O: ConnectionObserver,
    F: Fn(RealtimeMetrics),
{
    let mut throttle = UpdateThrottle::from_millis(Config::UPDATE_THROTTLE_MS);
    let mut render_tick: Option<AnimationFrame> = None;

    while let Some(signal) = inbox.next().await {
        match signal {
            Signal::Connect => manager.open(),
            Signal::Disconnect => manager.close(true),
            Signal::Opened => manager.handle_opened(),
            Signal::Errored => manager.handle_error(),
            Signal::Closed => manager.handle_closed(),
            Signal::RetryDue => manager.handle_retry_due(),
            Signal::Frame(raw) => {
                let Some(MetricEvent::MetricsUpdate(metrics)) = manager.handle_message(&raw)
                else {
                    continue;
                };
                if throttle.submit(metrics, Utc::now()) == Submission::Scheduled {
                    let signals = signals.clone();
                    render_tick = Some(request_animation_frame(move |_| {
                        forward(&signals, Signal::RenderTick);
                    }));
                }
            }
            Signal::RenderTick => {
                render_tick = None;
                if let Some(metrics) = throttle.take() {
                    on_metrics(metrics);
                }
            }
            Signal::Shutdown => {
                manager.close(true);
                break;
            }
        }
    }

    drop(render_tick);
}
