//! Render lifecycle events and their listeners.
//!
//! Listeners observe the renderer but never hold it. Anything a listener
//! wants the renderer to do goes into [`ListenerRequests`], which the
//! renderer carries out after every listener has run.

use crate::model::{ChangeMask, ViewportSize};
use crate::view_state::ScrollbarVisibility;

/// Events the renderer emits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderEvent {
    /// Emitted after the guard tier of a pass, before any layout.
    BeforeRender,
    /// Emitted after all layers were updated.
    AfterRender,
    /// The cached size changed.
    Resize {
        /// Size before the change.
        old: ViewportSize,
    },
    /// A scrollbar was shown or hidden.
    ScrollbarVisibilityChanged(ScrollbarVisibility),
}

/// Work listeners ask the renderer to do once the event has been delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerRequests {
    /// Re-measure the container; `Some(true)` forces a synchronous render.
    pub resize: Option<bool>,
    /// Change reasons to schedule.
    pub schedule: ChangeMask,
}

impl ListenerRequests {
    /// Ask for a resize. A forced request wins over an unforced one.
    pub fn request_resize(&mut self, force: bool) {
        self.resize = Some(self.resize.unwrap_or(false) || force);
    }

    /// Ask for change reasons to be scheduled.
    pub fn request_schedule(&mut self, changes: ChangeMask) {
        self.schedule |= changes;
    }

    /// True if no listener asked for anything.
    pub fn is_empty(&self) -> bool {
        self.resize.is_none() && self.schedule.is_empty()
    }

    fn merge(&mut self, other: Self) {
        if let Some(force) = other.resize {
            self.request_resize(force);
        }
        self.schedule |= other.schedule;
    }
}

/// Handle returned by [`EventEmitter::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A render event listener.
pub type Listener = Box<dyn FnMut(&RenderEvent, &mut ListenerRequests)>;

/// Ordered list of listeners.
#[derive(Default)]
pub struct EventEmitter {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventEmitter {
    /// Register a listener; listeners run in registration order.
    pub fn on(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` for an unknown id.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener and collect their requests.
    pub fn emit(&mut self, event: &RenderEvent) -> ListenerRequests {
        let mut requests = ListenerRequests::default();
        for (_, listener) in &mut self.listeners {
            let mut own = ListenerRequests::default();
            listener(event, &mut own);
            requests.merge(own);
        }
        requests
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
