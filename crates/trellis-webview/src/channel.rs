//! Inbound event queue and the subscriptions that gate it.
//!
//! Hosting-environment callbacks run outside the owner's control, so they
//! only push into an [`Inbox`]. The owner drains it from its own event loop,
//! one event at a time, in arrival order. An event whose kind has no live
//! [`Subscription`] is dropped on arrival.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

use crate::events::{EventKind, SurfaceEvent};

#[derive(Debug, Default)]
struct InboxState {
    queue: VecDeque<SurfaceEvent>,
    listeners: HashMap<EventKind, usize>,
}

impl InboxState {
    fn is_subscribed(&self, kind: EventKind) -> bool {
        self.listeners.get(&kind).copied().unwrap_or(0) > 0
    }
}

/// FIFO of raw events shared between a host callback and its owner.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    inner: Arc<Mutex<InboxState>>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, InboxState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue an event. Returns `false` if nobody listens for its kind.
    pub fn push(&self, event: SurfaceEvent) -> bool {
        let mut state = self.state();
        if !state.is_subscribed(event.kind()) {
            trace!(kind = ?event.kind(), "event dropped: no subscription");
            return false;
        }
        state.queue.push_back(event);
        true
    }

    pub fn push_message(&self, body: impl Into<String>) -> bool {
        self.push(SurfaceEvent::Message(body.into()))
    }

    pub fn push_closed(&self) -> bool {
        self.push(SurfaceEvent::Closed)
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<SurfaceEvent> {
        self.state().queue.drain(..).collect()
    }

    /// Start accepting events of `kind` until the returned subscription is
    /// disposed.
    pub fn subscribe(&self, kind: EventKind) -> Subscription {
        *self.state().listeners.entry(kind).or_insert(0) += 1;
        Subscription {
            inbox: self.clone(),
            kind,
            active: true,
        }
    }

    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.state().is_subscribed(kind)
    }

    pub fn len(&self) -> usize {
        self.state().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().queue.is_empty()
    }

    fn unsubscribe(&self, kind: EventKind) {
        let mut state = self.state();
        if let Some(count) = state.listeners.get_mut(&kind) {
            *count = count.saturating_sub(1);
        }
        if !state.is_subscribed(kind) {
            // In-flight events of this kind are dropped with the listener.
            state.queue.retain(|e| e.kind() != kind);
        }
    }
}

/// A live listener registration on an [`Inbox`].
///
/// Disposing (or dropping) it releases the listener exactly once.
#[derive(Debug)]
pub struct Subscription {
    inbox: Inbox,
    kind: EventKind,
    active: bool,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Release the listener. Returns `true` only on the call that released it.
    pub fn dispose(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.inbox.unsubscribe(self.kind);
        true
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}
