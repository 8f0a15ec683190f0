//! Shared "request in flight" indicator.
//!
//! Every persistence call holds a [`LoadingGuard`]; the indicator reads as
//! loading while any guard is alive. Guards release on drop, so an error or
//! an abandoned future cannot leave the indicator stuck.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    active: Rc<Cell<usize>>,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one more request as in flight until the guard is dropped.
    pub fn begin(&self) -> LoadingGuard {
        self.active.set(self.active.get() + 1);
        LoadingGuard {
            active: Rc::clone(&self.active),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.active.get() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.active.get()
    }
}

#[derive(Debug)]
#[must_use = "the request counts as finished as soon as the guard is dropped"]
pub struct LoadingGuard {
    active: Rc<Cell<usize>>,
}

impl LoadingGuard {
    pub fn in_flight(&self) -> usize {
        self.active.get()
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.active.set(self.active.get().saturating_sub(1));
    }
}
