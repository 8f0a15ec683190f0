//! Gesture listener bookkeeping.
//!
//! Every listener the surface attaches is recorded here under a key, and is
//! only dispatched to while its key is bound. Unmounting a tool releases its
//! keys, so a remounted tool never inherits callbacks from a previous mount.

/// Handle returned when a listener is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerKey(u64);

/// Events raised by the mounted tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureEvent {
    /// The select tool picked a feature or nothing
    Select,
    /// A sketch was started
    DrawStart,
    /// A sketch was finished
    DrawEnd,
    /// A vertex drag on the edited feature finished
    ModifyEnd,
    /// The geometry of the active sketch changed
    SketchChange,
}

#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_key: u64,
    bound: Vec<(ListenerKey, GestureEvent)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, event: GestureEvent) -> ListenerKey {
        let key = ListenerKey(self.next_key);
        self.next_key += 1;
        self.bound.push((key, event));
        log::trace!("Bound {:?} listener {:?}", event, key);
        key
    }

    /// Release a listener. Returns `false` if the key was not bound.
    pub fn unbind(&mut self, key: ListenerKey) -> bool {
        let before = self.bound.len();
        self.bound.retain(|(k, _)| *k != key);
        before != self.bound.len()
    }

    /// Number of listeners that will run when `event` fires.
    pub fn count(&self, event: GestureEvent) -> usize {
        self.bound.iter().filter(|(_, e)| *e == event).count()
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// Release everything. Returns how many listeners were still bound.
    pub fn clear(&mut self) -> usize {
        let released = self.bound.len();
        self.bound.clear();
        released
    }
}
