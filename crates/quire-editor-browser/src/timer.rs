//! Debounce timer backed by `setTimeout`.

use std::rc::Weak;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use quire_editor_core::Timer;

use crate::instance::EditorInstance;

/// Starts `gloo_timers` timeouts that fire the owning instance's debounce.
///
/// Holds the instance weakly; a timeout that outlives its instance does
/// nothing. Dropping the returned `Timeout` clears it.
pub struct TimeoutTimer {
    instance: Weak<EditorInstance>,
}

impl TimeoutTimer {
    pub fn new(instance: Weak<EditorInstance>) -> Self {
        Self { instance }
    }
}

impl Timer for TimeoutTimer {
    type Handle = Timeout;

    fn start(&mut self, delay: Duration) -> Timeout {
        let instance = self.instance.clone();
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || {
            if let Some(instance) = instance.upgrade() {
                instance.fire_debounce();
            }
        })
    }
}
