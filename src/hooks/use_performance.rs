use crate::config::Config;
use crate::hooks::use_logs::LogHandle;
use crate::models::{cluster::SectionState, metrics::PerformanceHistory};
use crate::services::api::DashboardClient;
use gloo_timers::future::TimeoutFuture;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Performance history for the charts, refreshed on its own slower period.
/// A failed refresh keeps the last loaded history on screen.
#[hook]
pub fn use_performance(log: LogHandle) -> SectionState<PerformanceHistory> {
    let state = use_state(|| SectionState::Loading);
    let trigger = use_state(|| 0u32); // Polling trigger

    {
        let state = state.clone();
        let trigger_value = *trigger;

        use_effect_with(trigger_value, move |_| {
            let state = state.clone();
            let trigger = trigger;

            spawn_local(async move {
                let result = match DashboardClient::new() {
                    Ok(client) => client.fetch_performance().await,
                    Err(e) => Err(e),
                };

                match result {
                    Ok(history) => state.set(SectionState::Loaded(Rc::new(history))),
                    Err(e) => {
                        log.warn(format!("Failed to load performance data: {e}"));
                        if state.data().is_none() {
                            state.set(SectionState::Error(e.to_string()));
                        }
                    }
                }

                if Config::ENABLE_AUTO_REFRESH {
                    TimeoutFuture::new(Config::PERFORMANCE_INTERVAL_MS).await;
                    trigger.set(*trigger + 1);
                }
            });

            || ()
        });
    }

    (*state).clone()
}
