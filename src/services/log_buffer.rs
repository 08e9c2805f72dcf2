use crate::models::logs::{LogEntry, LogLevel};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

pub const CLEARED_MESSAGE: &str = "Logs cleared";

/// Bounded, ordered operator log with batched flushing.
///
/// Entries are staged by [`append`](Self::append) and only become visible
/// once [`flush`](Self::flush) runs, which the caller schedules at the end of
/// a coalescing window. Retention is FIFO: once more than `capacity` entries
/// are visible, the oldest are evicted first.
#[derive(Debug, Clone)]
pub struct LogAggregator {
    retained: VecDeque<LogEntry>,
    pending: Vec<LogEntry>,
    capacity: usize,
}

impl LogAggregator {
    pub fn new(capacity: usize) -> Self {
        Self {
            retained: VecDeque::with_capacity(capacity),
            pending: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Stages an entry. Returns `true` when it opens a new batch, i.e. the
    /// caller has to schedule a flush.
    pub fn append(&mut self, level: LogLevel, message: impl Into<String>, now: DateTime<Utc>) -> bool {
        let opens_batch = self.pending.is_empty();
        self.pending.push(LogEntry::new(level, message, now));
        opens_batch
    }

    /// Moves staged entries into the retained log in submission order and
    /// returns them.
    pub fn flush(&mut self) -> Vec<LogEntry> {
        let batch = std::mem::take(&mut self.pending);
        self.retained.extend(batch.iter().cloned());
        while self.retained.len() > self.capacity {
            self.retained.pop_front();
        }
        batch
    }

    /// Drops everything, staged entries included, leaving one synthetic entry.
    pub fn clear(&mut self, now: DateTime<Utc>) {
        self.pending.clear();
        self.retained.clear();
        self.retained
            .push_back(LogEntry::new(LogLevel::Info, CLEARED_MESSAGE, now));
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.retained.iter().cloned().collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.retained.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
