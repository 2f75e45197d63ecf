//! Behavior plumbing
//!
//! Widget state lives in an `Rc<RefCell<_>>` shared by the widget's
//! listeners. Handlers are plain functions so every listener of a widget
//! reads the same way; their errors are logged, not propagated, because
//! nothing upstream of an event dispatch can act on them.

use std::cell::RefCell;
use std::rc::Rc;

use akit_dom::{Document, Event, EventTarget, EventType, Subscription, Subscriptions};

use crate::WidgetResult;

/// Event handler over shared widget state
pub(crate) type Handler<S> = fn(&Rc<RefCell<S>>, &mut Document, &mut Event) -> WidgetResult<()>;

/// An attached widget
pub trait Behavior {
    /// Widget name used in logs and errors
    const NAME: &'static str;

    /// Remove every listener; calling it again is a no-op
    fn destroy(&mut self);

    /// Whether listeners are still registered
    fn is_attached(&self) -> bool;
}

/// Register `handler` for `event_type` on `target`
pub(crate) fn listen<S: 'static>(
    doc: &mut Document,
    state: &Rc<RefCell<S>>,
    target: impl Into<EventTarget>,
    event_type: EventType,
    handler: Handler<S>,
) -> Subscription {
    let state = Rc::clone(state);
    let name = event_type.to_string();
    doc.add_event_listener(target, event_type, move |doc, event| {
        if let Err(err) = handler(&state, doc, event) {
            tracing::warn!(event = %name, %err, "widget handler failed");
        }
    })
}

/// Listener set builder for one widget instance
pub(crate) struct Wiring<'a, S> {
    doc: &'a mut Document,
    state: &'a Rc<RefCell<S>>,
    subs: Subscriptions,
}

impl<'a, S: 'static> Wiring<'a, S> {
    pub(crate) fn new(doc: &'a mut Document, state: &'a Rc<RefCell<S>>) -> Self {
        Self {
            doc,
            state,
            subs: Subscriptions::new(),
        }
    }

    pub(crate) fn on(
        mut self,
        target: impl Into<EventTarget>,
        event_type: EventType,
        handler: Handler<S>,
    ) -> Self {
        let sub = listen(self.doc, self.state, target, event_type, handler);
        self.subs.push(sub);
        self
    }

    pub(crate) fn finish(self) -> Subscriptions {
        self.subs
    }
}
