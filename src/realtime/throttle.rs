use chrono::{DateTime, TimeDelta, Utc};

/// Outcome of [`UpdateThrottle::submit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Accepted; the caller must schedule a render tick.
    Scheduled,
    /// Replaced the value waiting for the already scheduled tick.
    Merged,
    /// Arrived inside the minimum interval after the tick ran.
    Dropped,
}

/// Bounds render work triggered by push updates.
///
/// An update is accepted only if at least `min_interval` has passed since
/// the last accepted one. An accepted update arms one render tick; anything
/// arriving before that tick runs overwrites the waiting value, so the tick
/// renders the newest data. After the tick, updates inside the interval are
/// dropped outright.
#[derive(Debug)]
pub struct UpdateThrottle<T> {
    min_interval: TimeDelta,
    last_accepted: Option<DateTime<Utc>>,
    pending: Option<T>,
}

impl<T> UpdateThrottle<T> {
    pub fn new(min_interval: TimeDelta) -> Self {
        Self {
            min_interval,
            last_accepted: None,
            pending: None,
        }
    }

    pub fn from_millis(min_interval_ms: u32) -> Self {
        Self::new(TimeDelta::milliseconds(i64::from(min_interval_ms)))
    }

    pub fn submit(&mut self, update: T, now: DateTime<Utc>) -> Submission {
        // A clock that stepped backwards counts as the interval having passed.
        let too_soon = self.last_accepted.is_some_and(|last| {
            let elapsed = now - last;
            elapsed >= TimeDelta::zero() && elapsed < self.min_interval
        });

        if too_soon {
            return match self.pending.as_mut() {
                Some(waiting) => {
                    *waiting = update;
                    Submission::Merged
                }
                None => Submission::Dropped,
            };
        }

        self.last_accepted = Some(now);
        if self.pending.replace(update).is_some() {
            Submission::Merged
        } else {
            Submission::Scheduled
        }
    }

    /// Called on the render tick. Yields the value to render, if any.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + TimeDelta::milliseconds(ms)
    }

    #[test]
    fn test_burst_renders_once_with_last_value() {
        let mut throttle = UpdateThrottle::from_millis(500);

        assert_eq!(throttle.submit(1, at(0)), Submission::Scheduled);
        for (i, value) in (2..=10).enumerate() {
            assert_eq!(throttle.submit(value, at(10 * i as i64 + 10)), Submission::Merged);
        }

        assert_eq!(throttle.take(), Some(10));
        assert_eq!(throttle.take(), None);
    }

    #[test]
    fn test_drops_inside_interval_after_tick() {
        let mut throttle = UpdateThrottle::from_millis(500);
        throttle.submit("a", at(0));
        throttle.take();

        assert_eq!(throttle.submit("b", at(499)), Submission::Dropped);
        assert!(!throttle.has_pending());

        assert_eq!(throttle.submit("c", at(500)), Submission::Scheduled);
        assert_eq!(throttle.take(), Some("c"));
    }

    #[test]
    fn test_dropped_updates_do_not_extend_the_window() {
        let mut throttle = UpdateThrottle::from_millis(500);
        throttle.submit(1, at(0));
        throttle.take();
        throttle.submit(2, at(300));

        assert_eq!(throttle.submit(3, at(510)), Submission::Scheduled);
    }

    #[test]
    fn test_clock_stepping_back_does_not_stall() {
        let mut throttle = UpdateThrottle::from_millis(500);
        throttle.submit(1, at(0));
        throttle.take();

        let hour_ago = -3_600_000;
        assert_eq!(throttle.submit(2, at(hour_ago)), Submission::Scheduled);
        assert_eq!(throttle.take(), Some(2));

        // the window restarts from the new reading
        assert_eq!(throttle.submit(3, at(hour_ago + 100)), Submission::Dropped);
        assert_eq!(throttle.submit(4, at(hour_ago + 500)), Submission::Scheduled);
    }
}
