//! Cancellable debounce timer.
//!
//! A `Debouncer` owns at most one running platform timer. Every `reset`
//! cancels the running timer and starts a new one, so a burst of edits
//! produces a single `fire` once the quiet period has elapsed.

use std::time::Duration;

/// Platform timer source.
///
/// `start` schedules a single callback after `delay`; the platform decides
/// what that callback does (the browser upgrades its weak instance handle
/// and calls `EditorSession::fire_debounce`). Dropping the
/// returned handle must cancel the callback if it has not run yet.
pub trait Timer {
    type Handle;

    fn start(&mut self, delay: Duration) -> Self::Handle;
}

/// Debounce state owned by an editor session.
pub struct Debouncer<T: Timer> {
    timer: T,
    delay: Duration,
    running: Option<T::Handle>,
}

impl<T: Timer> Debouncer<T> {
    pub fn new(timer: T, delay: Duration) -> Self {
        Self {
            timer,
            delay,
            running: None,
        }
    }

    /// Cancel any running timer and start a fresh one.
    pub fn reset(&mut self) {
        // Drop the old handle first so it is cancelled before the new one starts.
        self.running = None;
        self.running = Some(self.timer.start(self.delay));
    }

    /// Called when the timer elapses. Returns whether a debounced action
    /// was pending; a stale or cancelled timer returns `false`.
    pub fn fire(&mut self) -> bool {
        self.running.take().is_some()
    }

    /// Cancel without firing. Returns whether anything was pending.
    pub fn cancel(&mut self) -> bool {
        self.running.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.running.is_some()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Records starts and cancellations.
    #[derive(Default, Clone)]
    struct Log(Rc<RefCell<Vec<String>>>);

    struct Handle(u32, Log);

    impl Drop for Handle {
        fn drop(&mut self) {
            self.1.0.borrow_mut().push(format!("cancel {}", self.0));
        }
    }

    struct FakeTimer {
        next: u32,
        log: Log,
    }

    impl Timer for FakeTimer {
        type Handle = Handle;

        fn start(&mut self, delay: Duration) -> Handle {
            self.next += 1;
            self.log
                .0
                .borrow_mut()
                .push(format!("start {} {}ms", self.next, delay.as_millis()));
            Handle(self.next, self.log.clone())
        }
    }

    fn debouncer() -> (Debouncer<FakeTimer>, Log) {
        let log = Log::default();
        let timer = FakeTimer {
            next: 0,
            log: log.clone(),
        };
        (Debouncer::new(timer, Duration::from_millis(300)), log)
    }

    #[test]
    fn test_reset_cancels_previous_timer() {
        let (mut d, log) = debouncer();
        d.reset();
        d.reset();
        d.reset();
        assert!(d.is_pending());
        assert_eq!(
            *log.0.borrow(),
            vec![
                "start 1 300ms",
                "cancel 1",
                "start 2 300ms",
                "cancel 2",
                "start 3 300ms"
            ]
        );
    }

    #[test]
    fn test_fire_once() {
        let (mut d, _log) = debouncer();
        d.reset();
        assert!(d.fire());
        assert!(!d.fire());
        assert!(!d.is_pending());
    }

    #[test]
    fn test_cancel_without_pending() {
        let (mut d, log) = debouncer();
        assert!(!d.cancel());
        d.reset();
        assert!(d.cancel());
        assert!(!d.fire());
        assert_eq!(log.0.borrow().last().map(String::as_str), Some("cancel 1"));
    }
}
