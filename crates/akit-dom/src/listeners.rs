//! Event Listener Registry
//!
//! Listeners are owned by the document's registry and addressed by a
//! numeric id. Callers hold a `Subscription`; dropping it unregisters
//! the listener.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::{Document, Event, EventTarget, EventType};

/// Event listener callback
pub type Listener = Rc<dyn Fn(&mut Document, &mut Event)>;

struct Registration {
    id: u64,
    target: EventTarget,
    event_type: EventType,
    listener: Listener,
}

/// All listeners of one document
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    entries: Vec<Registration>,
}

impl ListenerRegistry {
    pub(crate) fn add(
        &mut self,
        target: EventTarget,
        event_type: EventType,
        listener: Listener,
    ) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.entries.push(Registration {
            id,
            target,
            event_type,
            listener,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|r| r.id != id);
        self.entries.len() != before
    }

    pub(crate) fn is_registered(&self, id: u64) -> bool {
        self.entries.iter().any(|r| r.id == id)
    }

    /// Listeners for one target and type, in registration order
    pub(crate) fn snapshot(
        &self,
        target: EventTarget,
        event_type: &EventType,
    ) -> Vec<(u64, Listener)> {
        self.entries
            .iter()
            .filter(|r| r.target == target && &r.event_type == event_type)
            .map(|r| (r.id, Rc::clone(&r.listener)))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Handle to a registered listener
///
/// Cancelling (or dropping) removes the listener; cancelling twice is a
/// no-op.
#[must_use = "dropping a Subscription removes its listener"]
pub struct Subscription {
    registry: Weak<RefCell<ListenerRegistry>>,
    id: u64,
}

impl Subscription {
    pub(crate) fn new(registry: &Rc<RefCell<ListenerRegistry>>, id: u64) -> Self {
        Self {
            registry: Rc::downgrade(registry),
            id,
        }
    }

    /// Remove the listener now
    pub fn cancel(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(self.id);
        }
        self.registry = Weak::new();
    }

    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|r| r.borrow().is_registered(self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Owned group of subscriptions, torn down together
#[derive(Debug, Default)]
pub struct Subscriptions {
    inner: Vec<Subscription>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.inner.push(subscription);
    }

    /// Remove every listener; safe to call repeatedly
    pub fn clear(&mut self) {
        for mut subscription in self.inner.drain(..) {
            subscription.cancel();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Extend<Subscription> for Subscriptions {
    fn extend<I: IntoIterator<Item = Subscription>>(&mut self, iter: I) {
        self.inner.extend(iter);
    }
}
