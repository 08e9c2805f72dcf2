use crate::config::Config;
use crate::models::logs::{LogEntry, LogLevel};
use crate::services::log_buffer::LogAggregator;
use crate::utils::coalesce::CoalescingTimer;
use chrono::Utc;
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

/// Writes to the operator log. Entries reach the panel in batches, at most
/// once per flush window, and are mirrored to the browser console.
#[derive(Clone)]
pub struct LogHandle {
    buffer: Rc<RefCell<LogAggregator>>,
    flush: CoalescingTimer,
    publish: Rc<dyn Fn(Rc<Vec<LogEntry>>)>,
}

impl LogHandle {
    pub fn new<F>(capacity: usize, window_ms: u32, publish: F) -> Self
    where
        F: Fn(Rc<Vec<LogEntry>>) + 'static,
    {
        let buffer = Rc::new(RefCell::new(LogAggregator::new(capacity)));
        let publish: Rc<dyn Fn(Rc<Vec<LogEntry>>)> = Rc::new(publish);

        let flush = {
            let buffer = buffer.clone();
            let publish = publish.clone();
            CoalescingTimer::new(window_ms, move || {
                let (batch, snapshot) = {
                    let mut buffer = buffer.borrow_mut();
                    let batch = buffer.flush();
                    (batch, buffer.entries())
                };
                batch.iter().for_each(mirror_to_console);
                publish(Rc::new(snapshot));
            })
        };

        Self {
            buffer,
            flush,
            publish,
        }
    }

    pub fn push(&self, level: LogLevel, message: impl Into<String>) {
        let opens_batch = self
            .buffer
            .borrow_mut()
            .append(level, message, Utc::now());
        if opens_batch {
            self.flush.arm();
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(LogLevel::Error, message);
    }

    /// Empties the log right away, staged entries included.
    pub fn clear(&self) {
        self.flush.cancel();
        let snapshot = {
            let mut buffer = self.buffer.borrow_mut();
            buffer.clear(Utc::now());
            buffer.entries()
        };
        (self.publish)(Rc::new(snapshot));
    }
}

impl PartialEq for LogHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.buffer, &other.buffer)
    }
}

fn mirror_to_console(entry: &LogEntry) {
    let line = entry.to_string();
    match entry.level {
        LogLevel::Info => {
            gloo::console::log!(line);
        }
        LogLevel::Warn => {
            gloo::console::warn!(line);
        }
        LogLevel::Error => {
            gloo::console::error!(line);
        }
    }
}

/// Handle returned by `use_logs` hook
#[derive(Clone, PartialEq)]
pub struct LogsHandle {
    pub entries: Rc<Vec<LogEntry>>,
    pub log: LogHandle,
    pub clear: Callback<()>,
}

/// Operator log shared by the whole dashboard.
#[hook]
pub fn use_logs() -> LogsHandle {
    let entries = use_state(|| Rc::new(Vec::<LogEntry>::new()));

    let log = {
        let setter = entries.setter();
        use_memo((), move |_| {
            LogHandle::new(Config::LOG_RETENTION, Config::LOG_FLUSH_WINDOW_MS, move |snapshot| {
                setter.set(snapshot);
            })
        })
    };

    let clear = {
        let log = (*log).clone();
        Callback::from(move |()| log.clear())
    };

    LogsHandle {
        entries: (*entries).clone(),
        log: (*log).clone(),
        clear,
    }
}
