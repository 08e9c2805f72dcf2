use crate::config::Config;
use crate::hooks::use_logs::LogHandle;
use crate::models::cluster::{Manager, NodeKind, Overview, SectionState, Worker};
use crate::models::error::AppError;
use crate::realtime::Liveness;
use crate::services::api::DashboardClient;
use crate::services::poll::{PollScheduler, TickOutcome, Trigger};
use chrono::{DateTime, Utc};
use gloo_timers::callback::Interval;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Setters for everything a refresh cycle updates.
#[derive(Clone)]
struct Sections {
    overview: UseStateSetter<SectionState<Overview>>,
    managers: UseStateSetter<SectionState<Vec<Manager>>>,
    workers: UseStateSetter<SectionState<Vec<Worker>>>,
    last_update: UseStateSetter<Option<DateTime<Utc>>>,
}

impl Sections {
    fn fail_all(&self, message: &str) {
        self.overview.set(SectionState::Error(message.to_string()));
        self.managers.set(SectionState::Error(message.to_string()));
        self.workers.set(SectionState::Error(message.to_string()));
    }
}

/// Starts one refresh cycle in the background.
fn spawn_refresh(
    scheduler: PollScheduler,
    client: Rc<Result<DashboardClient, AppError>>,
    sections: Sections,
    log: LogHandle,
    trigger: Trigger,
) {
    if scheduler.suppresses(trigger) {
        return;
    }
    let client = match client.as_ref() {
        Ok(client) => client.clone(),
        Err(e) => {
            sections.fail_all(&e.to_string());
            log.error(format!("Failed to load data: {e}"));
            return;
        }
    };

    spawn_local(async move {
        match scheduler.tick(&client, trigger).await {
            TickOutcome::SuppressedLive => {}
            TickOutcome::SkippedInFlight => log.info("Refresh already in progress, skipping"),
            TickOutcome::Refreshed(report) => {
                let (level, summary) = report.summary();
                sections.overview.set(report.overview.into());
                sections.managers.set(report.managers.into());
                sections.workers.set(report.workers.into());
                sections.last_update.set(Some(report.completed_at));
                log.push(level, summary);
            }
        }
    });
}

/// Handle returned by `use_cluster` hook
#[derive(Clone, PartialEq)]
pub struct ClusterHandle {
    pub overview: SectionState<Overview>,
    pub managers: SectionState<Vec<Manager>>,
    pub workers: SectionState<Vec<Worker>>,
    pub last_update: Option<DateTime<Utc>>,
    pub refresh: Callback<()>,
    pub restart: Callback<(NodeKind, String)>,
    pub details: Callback<(NodeKind, String)>,
}

/// Cluster state from REST polling. Loads on mount, then polls on a fixed
/// period while the push channel is not live.
#[hook]
pub fn use_cluster(liveness: Liveness, log: LogHandle) -> ClusterHandle {
    let overview = use_state(|| SectionState::Loading);
    let managers = use_state(|| SectionState::Loading);
    let workers = use_state(|| SectionState::Loading);
    let last_update = use_state(|| None::<DateTime<Utc>>);

    let scheduler = use_memo(liveness, |liveness| PollScheduler::new(liveness.clone()));
    let client = use_memo((), |_| DashboardClient::new());

    let sections = Sections {
        overview: overview.setter(),
        managers: managers.setter(),
        workers: workers.setter(),
        last_update: last_update.setter(),
    };

    // Effect: initial load and periodic polling
    {
        let scheduler = (*scheduler).clone();
        let client = client.clone();
        let sections = sections.clone();
        let log = log.clone();

        use_effect_with((), move |_| {
            spawn_refresh(
                scheduler.clone(),
                client.clone(),
                sections.clone(),
                log.clone(),
                Trigger::Manual,
            );

            let interval = Config::ENABLE_AUTO_REFRESH.then(|| {
                Interval::new(Config::POLLING_INTERVAL_MS, move || {
                    spawn_refresh(
                        scheduler.clone(),
                        client.clone(),
                        sections.clone(),
                        log.clone(),
                        Trigger::Timer,
                    );
                })
            });

            move || drop(interval)
        });
    }

    let refresh = {
        let scheduler = (*scheduler).clone();
        let client = client.clone();
        let log = log.clone();
        Callback::from(move |()| {
            log.info("Manual refresh triggered");
            spawn_refresh(
                scheduler.clone(),
                client.clone(),
                sections.clone(),
                log.clone(),
                Trigger::Manual,
            );
        })
    };

    let restart = {
        let client = client.clone();
        let log = log.clone();
        Callback::from(move |(kind, id): (NodeKind, String)| {
            if !gloo::dialogs::confirm(&format!("Restart {} {id}?", kind.as_str())) {
                return;
            }
            let Ok(client) = client.as_ref().clone() else {
                log.error(format!("Failed to restart {id}: HTTP client unavailable"));
                return;
            };
            let log = log.clone();
            spawn_local(async move {
                match client.restart(kind, &id).await {
                    Ok(message) => log.info(message),
                    Err(e) => log.error(format!("Failed to restart {id}: {e}")),
                }
            });
        })
    };

    let details = {
        let log = log.clone();
        Callback::from(move |(_, id): (NodeKind, String)| {
            log.info(format!("Viewing details for {id}"));
        })
    };

    ClusterHandle {
        overview: (*overview).clone(),
        managers: (*managers).clone(),
        workers: (*workers).clone(),
        last_update: *last_update,
        refresh,
        restart,
        details,
    }
}
