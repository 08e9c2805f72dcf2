use gloo_timers::callback::Timeout;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Runs a callback once at the end of a fixed window, however many times the
/// window was armed in between.
///
/// Unlike a debounce, arming an already pending window does not push it
/// back, so a steady burst still flushes every `window_ms`.
///
/// # Example
///
/// ```rust,ignore
/// let flush = CoalescingTimer::new(100, move || write_batch());
/// flush.arm(); // schedules the flush
/// flush.arm(); // already pending, no-op
/// ```
#[derive(Clone)]
pub struct CoalescingTimer {
    window_ms: u32,
    callback: Rc<dyn Fn()>,
    armed: Rc<Cell<bool>>,
    // Last scheduled timeout. Kept after it fires and replaced on the next arm.
    pending: Rc<RefCell<Option<Timeout>>>,
}

impl CoalescingTimer {
    pub fn new<F>(window_ms: u32, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            window_ms,
            callback: Rc::new(callback),
            armed: Rc::new(Cell::new(false)),
            pending: Rc::new(RefCell::new(None)),
        }
    }

    /// Starts the window unless one is already running.
    pub fn arm(&self) {
        if self.armed.replace(true) {
            return;
        }

        let callback = self.callback.clone();
        let armed = self.armed.clone();
        let handle = Timeout::new(self.window_ms, move || {
            armed.set(false);
            callback();
        });
        *self.pending.borrow_mut() = Some(handle);
    }

    /// Drops the pending window without running the callback.
    pub fn cancel(&self) {
        self.armed.set(false);
        if let Some(handle) = self.pending.borrow_mut().take() {
            drop(handle);
        }
    }
}

impl PartialEq for CoalescingTimer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.armed, &other.armed)
    }
}
