use crate::hooks::use_logs::LogHandle;
use crate::models::{logs::LogLevel, metrics::RealtimeMetrics};
use crate::realtime::{ConnectionObserver, ConnectionState, Liveness, RealtimeController, spawn_realtime};
use crate::services::api::ApiConfig;
use std::rc::Rc;
use yew::prelude::*;

/// Forwards connection changes to component state and the operator log.
struct BrowserObserver {
    state: UseStateSetter<ConnectionState>,
    log: LogHandle,
}

impl ConnectionObserver for BrowserObserver {
    fn state_changed(&self, state: ConnectionState) {
        self.state.set(state);
    }

    fn log(&self, level: LogLevel, message: String) {
        self.log.push(level, message);
    }
}

/// Handle returned by `use_realtime` hook
#[derive(Clone, PartialEq)]
pub struct RealtimeHandle {
    pub state: ConnectionState,
    /// Last update let through by the throttle.
    pub metrics: Option<Rc<RealtimeMetrics>>,
    /// Shared with the poll scheduler.
    pub liveness: Liveness,
    pub toggle: Callback<()>,
}

/// Owns the push channel for the lifetime of the component. The channel
/// stays closed until the operator connects.
#[hook]
pub fn use_realtime(log: LogHandle) -> RealtimeHandle {
    let state = use_state(ConnectionState::default);
    let metrics = use_state(|| None::<Rc<RealtimeMetrics>>);
    let liveness = use_memo((), |_| Liveness::default());
    let controller = use_mut_ref(|| None::<RealtimeController>);

    {
        let state = state.setter();
        let metrics = metrics.setter();
        let liveness = (*liveness).clone();
        let controller = controller.clone();

        use_effect_with((), move |_| {
            let spawned = match ApiConfig::default().realtime_url() {
                Ok(url) => {
                    let observer = BrowserObserver {
                        state,
                        log: log.clone(),
                    };
                    Some(spawn_realtime(url, observer, liveness, move |update| {
                        metrics.set(Some(Rc::new(update)));
                    }))
                }
                Err(e) => {
                    log.error(format!("Real-time updates unavailable: {e}"));
                    None
                }
            };
            *controller.borrow_mut() = spawned.clone();

            move || {
                if let Some(controller) = spawned {
                    controller.shutdown();
                }
            }
        });
    }

    let toggle = {
        let current = *state;
        let controller = controller.clone();
        Callback::from(move |()| {
            let Some(controller) = controller.borrow().clone() else {
                return;
            };
            match current {
                ConnectionState::Connected
                | ConnectionState::Connecting
                | ConnectionState::Reconnecting => controller.disconnect(),
                ConnectionState::Disconnected | ConnectionState::GivenUp => controller.connect(),
            }
        })
    };

    RealtimeHandle {
        state: *state,
        metrics: (*metrics).clone(),
        liveness: (*liveness).clone(),
        toggle,
    }
}
