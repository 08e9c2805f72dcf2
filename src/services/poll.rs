use crate::models::{
    cluster::{Manager, Overview, Worker},
    error::AppError,
    logs::LogLevel,
};
use crate::realtime::Liveness;
use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Backend endpoints needed for one full refresh.
#[allow(async_fn_in_trait)]
pub trait ClusterSource {
    async fn fetch_overview(&self) -> Result<Overview, AppError>;
    async fn fetch_managers(&self) -> Result<Vec<Manager>, AppError>;
    async fn fetch_workers(&self) -> Result<Vec<Worker>, AppError>;
}

/// What started a refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Periodic tick; suppressed while the push channel is live.
    Timer,
    /// Initial load or the refresh button; only the in-flight guard applies.
    Manual,
}

/// Results of one refresh cycle. Each section succeeds or fails on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshReport {
    pub overview: Result<Overview, AppError>,
    pub managers: Result<Vec<Manager>, AppError>,
    pub workers: Result<Vec<Worker>, AppError>,
    pub completed_at: DateTime<Utc>,
}

impl RefreshReport {
    /// Names of the sections whose fetch failed, with the error.
    pub fn failures(&self) -> Vec<(&'static str, &AppError)> {
        [
            ("overview", self.overview.as_ref().err()),
            ("managers", self.managers.as_ref().err()),
            ("workers", self.workers.as_ref().err()),
        ]
        .into_iter()
        .filter_map(|(section, err)| err.map(|e| (section, e)))
        .collect()
    }

    /// One log line for the whole cycle.
    pub fn summary(&self) -> (LogLevel, String) {
        let failures = self.failures();
        if failures.is_empty() {
            return (LogLevel::Info, "Dashboard data refreshed".to_string());
        }

        let detail = failures
            .iter()
            .map(|(section, e)| format!("{section}: {e}"))
            .collect::<Vec<_>>()
            .join("; ");
        if failures.len() == 3 {
            (LogLevel::Error, format!("Failed to load data: {detail}"))
        } else {
            (LogLevel::Warn, format!("Dashboard partially refreshed ({detail})"))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The push channel is live; polling is not needed.
    SuppressedLive,
    /// A previous refresh has not finished yet.
    SkippedInFlight,
    Refreshed(RefreshReport),
}

/// Clears the in-flight flag when dropped, whichever way the refresh ends.
struct RefreshPermit(Rc<Cell<bool>>);

impl Drop for RefreshPermit {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Full-refresh fallback for when the push channel is down.
///
/// At most one refresh cycle is in flight at any time. Clones share the
/// in-flight flag.
#[derive(Debug, Clone, Default)]
pub struct PollScheduler {
    liveness: Liveness,
    in_flight: Rc<Cell<bool>>,
}

impl PollScheduler {
    pub fn new(liveness: Liveness) -> Self {
        Self {
            liveness,
            in_flight: Rc::new(Cell::new(false)),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.get()
    }

    /// Whether a tick from `trigger` should be skipped because the push
    /// channel is live. Only timer ticks are suppressed.
    pub fn suppresses(&self, trigger: Trigger) -> bool {
        trigger == Trigger::Timer && self.liveness.is_live()
    }

    fn try_acquire(&self) -> Option<RefreshPermit> {
        if self.in_flight.replace(true) {
            None
        } else {
            Some(RefreshPermit(self.in_flight.clone()))
        }
    }

    /// Runs one refresh cycle unless it is suppressed or already running.
    /// The three fetches run concurrently and are joined before the guard
    /// is released.
    pub async fn tick<S: ClusterSource>(&self, source: &S, trigger: Trigger) -> TickOutcome {
        if self.suppresses(trigger) {
            return TickOutcome::SuppressedLive;
        }
        let Some(_permit) = self.try_acquire() else {
            return TickOutcome::SkippedInFlight;
        };

        let (overview, managers, workers) = futures::join!(
            source.fetch_overview(),
            source.fetch_managers(),
            source.fetch_workers()
        );

        TickOutcome::Refreshed(RefreshReport {
            overview,
            managers,
            workers,
            completed_at: Utc::now(),
        })
    }
}

impl PartialEq for PollScheduler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.in_flight, &other.in_flight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cluster::ClusterHealth;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeSource {
        calls: Cell<usize>,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
        overview_fails: bool,
    }

    fn overview() -> Overview {
        Overview {
            healthy_managers: 1,
            total_managers: 1,
            healthy_workers: 2,
            total_workers: 3,
            running_services: 5,
            total_services: 6,
            cluster_health: ClusterHealth::Warning,
        }
    }

    impl ClusterSource for FakeSource {
        async fn fetch_overview(&self) -> Result<Overview, AppError> {
            self.calls.set(self.calls.get() + 1);
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            if self.overview_fails {
                Err(AppError::ApiError("Server error 503".to_string()))
            } else {
                Ok(overview())
            }
        }

        async fn fetch_managers(&self) -> Result<Vec<Manager>, AppError> {
            self.calls.set(self.calls.get() + 1);
            Ok(Vec::new())
        }

        async fn fetch_workers(&self) -> Result<Vec<Worker>, AppError> {
            self.calls.set(self.calls.get() + 1);
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_timer_tick_suppressed_while_live() {
        let liveness = Liveness::default();
        liveness.set(true);
        let scheduler = PollScheduler::new(liveness);
        let source = FakeSource::default();

        let outcome = block_on(scheduler.tick(&source, Trigger::Timer));
        assert_eq!(outcome, TickOutcome::SuppressedLive);
        assert_eq!(source.calls.get(), 0);

        // the refresh button still works
        let outcome = block_on(scheduler.tick(&source, Trigger::Manual));
        assert!(matches!(outcome, TickOutcome::Refreshed(_)));
        assert_eq!(source.calls.get(), 3);
    }

    #[test]
    fn test_suppression_tracks_liveness() {
        let liveness = Liveness::default();
        let scheduler = PollScheduler::new(liveness.clone());
        assert!(!scheduler.suppresses(Trigger::Timer));

        liveness.set(true);
        assert!(scheduler.suppresses(Trigger::Timer));
        assert!(!scheduler.suppresses(Trigger::Manual));

        liveness.set(false);
        assert!(!scheduler.suppresses(Trigger::Timer));
    }

    #[test]
    fn test_overlapping_tick_is_skipped() {
        let scheduler = PollScheduler::new(Liveness::default());
        let (release, gate) = oneshot::channel();
        let source = FakeSource {
            gate: RefCell::new(Some(gate)),
            ..Default::default()
        };

        block_on(async {
            let mut first = Box::pin(scheduler.tick(&source, Trigger::Timer));
            assert!(futures::poll!(first.as_mut()).is_pending());
            assert!(scheduler.is_refreshing());

            let second = scheduler.tick(&source, Trigger::Manual).await;
            assert_eq!(second, TickOutcome::SkippedInFlight);

            release.send(()).unwrap();
            assert!(matches!(first.await, TickOutcome::Refreshed(_)));
        });

        assert!(!scheduler.is_refreshing());
        assert_eq!(source.calls.get(), 3);
    }

    #[test]
    fn test_failed_section_does_not_block_others() {
        let scheduler = PollScheduler::new(Liveness::default());
        let source = FakeSource {
            overview_fails: true,
            ..Default::default()
        };

        let TickOutcome::Refreshed(report) = block_on(scheduler.tick(&source, Trigger::Timer))
        else {
            panic!("expected a refresh");
        };
        assert!(report.overview.is_err());
        assert_eq!(report.managers, Ok(Vec::new()));
        assert_eq!(report.workers, Ok(Vec::new()));
        assert!(!scheduler.is_refreshing());

        let (level, message) = report.summary();
        assert_eq!(level, LogLevel::Warn);
        assert!(message.contains("overview"));
        assert!(!message.contains("managers"));
    }

    #[test]
    fn test_guard_released_when_refresh_is_abandoned() {
        let scheduler = PollScheduler::new(Liveness::default());
        let (_release, gate) = oneshot::channel::<()>();
        let source = FakeSource {
            gate: RefCell::new(Some(gate)),
            ..Default::default()
        };

        block_on(async {
            let mut pending = Box::pin(scheduler.tick(&source, Trigger::Timer));
            assert!(futures::poll!(pending.as_mut()).is_pending());
        });

        assert!(!scheduler.is_refreshing());
    }

    #[test]
    fn test_summary_levels() {
        let ok = RefreshReport {
            overview: Ok(overview()),
            managers: Ok(Vec::new()),
            workers: Ok(Vec::new()),
            completed_at: Utc::now(),
        };
        assert_eq!(ok.summary().0, LogLevel::Info);

        let down = RefreshReport {
            overview: Err(AppError::ApiError("down".into())),
            managers: Err(AppError::ApiError("down".into())),
            workers: Err(AppError::RateLimited),
            completed_at: Utc::now(),
        };
        let (level, message) = down.summary();
        assert_eq!(level, LogLevel::Error);
        assert!(message.starts_with("Failed to load data"));
        assert_eq!(down.failures().len(), 3);
    }
}
