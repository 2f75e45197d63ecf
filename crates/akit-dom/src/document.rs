//! Document - event host
//!
//! Owns the tree, the listener registry, focus state and the deferred
//! task queue. Every public input helper (`click`, `press`, `focus`, ...)
//! is one host task: deferred tasks queued while it runs are flushed
//! after it returns, including after the default action of the input.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::listeners::ListenerRegistry;
use crate::{DomTree, Event, EventTarget, EventType, Key, KeyModifiers, NodeId, Subscription};

/// Deferred task
type Task = Box<dyn FnOnce(&mut Document)>;

/// Upper bound on deferred tasks run by one flush
const MAX_DEFERRED_RUNS: usize = 1024;

/// Tags focusable without a `tabindex`
const NATIVE_FOCUSABLE: &[&str] = &["button", "input", "select", "textarea", "summary"];

/// Document with event dispatch and focus tracking
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    listeners: Rc<RefCell<ListenerRegistry>>,
    active_element: Option<NodeId>,
    deferred: VecDeque<Task>,
    task_depth: u32,
    next_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.tree.len())
            .field("listeners", &self.listener_count())
            .field("active_element", &self.active_element)
            .field("deferred", &self.deferred.len())
            .finish()
    }
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::with_tree(DomTree::new())
    }

    /// Wrap an existing tree
    pub fn with_tree(tree: DomTree) -> Self {
        Self {
            tree,
            listeners: Rc::new(RefCell::new(ListenerRegistry::default())),
            active_element: None,
            deferred: VecDeque::new(),
            task_depth: 0,
            next_id: 0,
        }
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Generate an id not used by any element, e.g. `accordion-3`
    pub fn generate_id(&mut self, prefix: &str) -> String {
        loop {
            self.next_id += 1;
            let candidate = format!("{prefix}-{}", self.next_id);
            if self.tree.get_element_by_id(&candidate).is_none() {
                return candidate;
            }
        }
    }

    // =========================================================================
    // Listeners and dispatch
    // =========================================================================

    /// Register a listener; dropping the returned subscription removes it
    pub fn add_event_listener<F>(
        &mut self,
        target: impl Into<EventTarget>,
        event_type: EventType,
        listener: F,
    ) -> Subscription
    where
        F: Fn(&mut Document, &mut Event) + 'static,
    {
        let id = self
            .listeners
            .borrow_mut()
            .add(target.into(), event_type, Rc::new(listener));
        Subscription::new(&self.listeners, id)
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Dispatch an event as a host task and return it after propagation
    pub fn dispatch_event(&mut self, event: Event) -> Event {
        self.run_task(|doc| doc.dispatch(event))
    }

    /// Dispatch from inside a listener or deferred task
    ///
    /// Deferred tasks are not flushed; the enclosing host task does that.
    pub fn dispatch(&mut self, mut event: Event) -> Event {
        let path = self.propagation_path(&event);
        trace!(event = %event.event_type, target = ?event.target, "dispatch");

        for current in path {
            event.current_target = current;
            let listeners = self.listeners.borrow().snapshot(current, &event.event_type);
            for (id, listener) in listeners {
                // removed by an earlier listener of this dispatch
                if !self.listeners.borrow().is_registered(id) {
                    continue;
                }
                listener(self, &mut event);
            }
            if event.propagation_stopped() {
                break;
            }
        }

        event
    }

    fn propagation_path(&self, event: &Event) -> Vec<EventTarget> {
        let EventTarget::Node(node) = event.target else {
            return vec![EventTarget::Window];
        };

        let mut path = vec![EventTarget::Node(node)];
        if event.bubbles {
            path.extend(self.tree.ancestors(node).map(EventTarget::Node));
            path.push(EventTarget::Window);
        }
        path
    }

    fn run_task<R>(&mut self, task: impl FnOnce(&mut Self) -> R) -> R {
        self.task_depth += 1;
        let result = task(self);
        self.task_depth -= 1;
        if self.task_depth == 0 {
            self.flush();
        }
        result
    }

    // =========================================================================
    // Deferred tasks
    // =========================================================================

    /// Queue a task to run once the current host task has finished
    pub fn defer(&mut self, task: impl FnOnce(&mut Document) + 'static) {
        self.deferred.push_back(Box::new(task));
    }

    /// Queue a focus change
    pub fn defer_focus(&mut self, node: NodeId) {
        self.defer(move |doc| {
            doc.focus_node(node);
        });
    }

    /// Number of queued tasks
    pub fn pending_tasks(&self) -> usize {
        self.deferred.len()
    }

    /// Run queued tasks, including tasks they queue
    pub fn flush(&mut self) {
        let mut runs = 0;
        while let Some(task) = self.deferred.pop_front() {
            if runs == MAX_DEFERRED_RUNS {
                warn!(dropped = self.deferred.len() + 1, "deferred task queue did not settle");
                self.deferred.clear();
                break;
            }
            runs += 1;
            self.task_depth += 1;
            task(self);
            self.task_depth -= 1;
        }
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Currently focused element
    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element
    }

    /// Check whether a node can receive focus
    pub fn is_focusable(&self, node: NodeId) -> bool {
        let Some(tag) = self.tree.tag_name(node) else {
            return false;
        };
        if self.tree.has_attribute(node, "disabled") {
            return false;
        }
        self.tree.has_attribute(node, "tabindex")
            || NATIVE_FOCUSABLE.contains(&tag)
            || (tag == "a" && self.tree.has_attribute(node, "href"))
    }

    /// Check whether a node is reachable with the Tab key
    pub fn is_tabbable(&self, node: NodeId) -> bool {
        if !self.is_focusable(node) || self.is_hidden(node) {
            return false;
        }
        match self.tree.get_attribute(node, "tabindex") {
            Some(value) => value.trim().parse::<i32>().map_or(true, |i| i >= 0),
            None => true,
        }
    }

    fn is_hidden(&self, node: NodeId) -> bool {
        std::iter::once(node)
            .chain(self.tree.ancestors(node))
            .any(|n| self.tree.has_attribute(n, "hidden"))
    }

    /// Tabbable elements in document order
    pub fn tab_order(&self) -> Vec<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .filter(|&n| self.is_tabbable(n))
            .collect()
    }

    /// Move focus as a host task; returns false if nothing changed
    pub fn focus(&mut self, node: NodeId) -> bool {
        self.run_task(|doc| doc.focus_node(node))
    }

    /// Focus from inside a listener or deferred task
    pub fn focus_node(&mut self, node: NodeId) -> bool {
        if self.active_element == Some(node) || !self.tree.is_element(node) {
            return false;
        }

        let previous = self.active_element.take();
        if let Some(previous) = previous {
            self.fire_focus_pair(previous, EventType::Blur, EventType::FocusOut, Some(node));
        }

        debug!(node = %node, "focus");
        self.active_element = Some(node);
        self.fire_focus_pair(node, EventType::Focus, EventType::FocusIn, previous);
        true
    }

    /// Remove focus from the active element
    pub fn blur(&mut self) {
        self.run_task(|doc| {
            if let Some(previous) = doc.active_element.take() {
                debug!(node = %previous, "blur");
                doc.fire_focus_pair(previous, EventType::Blur, EventType::FocusOut, None);
            }
        });
    }

    fn fire_focus_pair(
        &mut self,
        node: NodeId,
        first: EventType,
        second: EventType,
        related: Option<NodeId>,
    ) {
        for event_type in [first, second] {
            let mut event = Event::new(event_type, node);
            event.related_target = related;
            self.dispatch(event);
        }
    }

    fn move_focus_sequential(&mut self, forward: bool) {
        let order = self.tab_order();
        let next = match self.active_element {
            None if forward => order.first().copied(),
            None => order.last().copied(),
            Some(current) => {
                let positions = self.tree.descendants(self.tree.root());
                let position = |n: NodeId| positions.iter().position(|&p| p == n);
                let here = position(current);
                if forward {
                    order.iter().copied().find(|&n| position(n) > here)
                } else {
                    order.iter().rev().copied().find(|&n| position(n) < here)
                }
            }
        };

        match next {
            Some(node) => {
                self.focus_node(node);
            }
            None => {
                if let Some(previous) = self.active_element.take() {
                    self.fire_focus_pair(previous, EventType::Blur, EventType::FocusOut, None);
                }
            }
        }
    }

    // =========================================================================
    // Host input
    // =========================================================================

    fn key_target(&self) -> EventTarget {
        EventTarget::Node(self.active_element.unwrap_or(self.tree.root()))
    }

    /// Press down a key on the focused element
    pub fn key_down(&mut self, key: Key) -> Event {
        self.key_down_with(key, KeyModifiers::default())
    }

    /// Press down a key with modifiers
    pub fn key_down_with(&mut self, key: Key, modifiers: KeyModifiers) -> Event {
        let target = self.key_target();
        self.dispatch_event(Event::keyboard(EventType::KeyDown, target, key, modifiers))
    }

    /// Release a key on the focused element
    pub fn key_up(&mut self, key: Key) -> Event {
        self.key_up_with(key, KeyModifiers::default())
    }

    /// Release a key with modifiers
    pub fn key_up_with(&mut self, key: Key, modifiers: KeyModifiers) -> Event {
        let target = self.key_target();
        self.dispatch_event(Event::keyboard(EventType::KeyUp, target, key, modifiers))
    }

    /// keydown then keyup
    pub fn press(&mut self, key: Key) {
        self.press_with(key, KeyModifiers::default());
    }

    /// keydown then keyup, with modifiers
    pub fn press_with(&mut self, key: Key, modifiers: KeyModifiers) {
        self.key_down_with(key.clone(), modifiers);
        self.key_up_with(key, modifiers);
    }

    /// Tab: keydown, sequential focus move, keyup on the new focus
    pub fn press_tab(&mut self) {
        self.tab(KeyModifiers::default());
    }

    /// Shift+Tab
    pub fn press_shift_tab(&mut self) {
        self.tab(KeyModifiers::SHIFT);
    }

    fn tab(&mut self, modifiers: KeyModifiers) {
        self.run_task(|doc| {
            let target = doc.key_target();
            let down =
                doc.dispatch(Event::keyboard(EventType::KeyDown, target, Key::Tab, modifiers));
            if !down.default_prevented() {
                doc.move_focus_sequential(!modifiers.shift);
            }
            let target = doc.key_target();
            doc.dispatch(Event::keyboard(EventType::KeyUp, target, Key::Tab, modifiers));
        });
    }

    /// pointerdown, focus, pointerup, click
    pub fn click(&mut self, node: NodeId) {
        self.run_task(|doc| {
            let down = doc.dispatch(Event::new(EventType::PointerDown, node));
            if !down.default_prevented() {
                let focusable = std::iter::once(node)
                    .chain(doc.tree.ancestors(node))
                    .find(|&n| doc.is_focusable(n));
                if let Some(focusable) = focusable {
                    doc.focus_node(focusable);
                }
            }
            doc.dispatch(Event::new(EventType::PointerUp, node));
            doc.dispatch(Event::new(EventType::Click, node));
        });
    }

    /// Pointer pressed at client coordinates
    pub fn pointer_down(&mut self, node: NodeId, x: f64, y: f64) -> Event {
        self.dispatch_event(Event::pointer(EventType::PointerDown, node, x, y))
    }

    /// Pointer released over a target
    pub fn pointer_up(&mut self, target: impl Into<EventTarget>, x: f64, y: f64) -> Event {
        self.dispatch_event(Event::pointer(EventType::PointerUp, target, x, y))
    }

    /// Pointer moved over a target
    pub fn pointer_move(&mut self, target: impl Into<EventTarget>, x: f64, y: f64) -> Event {
        self.dispatch_event(Event::pointer(EventType::PointerMove, target, x, y))
    }

    /// Pointer entered a node
    pub fn pointer_enter(&mut self, node: NodeId) -> Event {
        self.dispatch_event(Event::new(EventType::PointerEnter, node))
    }

    /// Pointer left a node
    pub fn pointer_leave(&mut self, node: NodeId) -> Event {
        self.dispatch_event(Event::new(EventType::PointerLeave, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn doc_with_buttons(n: usize) -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new();
        let root = doc.tree.root();
        let div = doc.tree.create_element("div");
        doc.tree.append_child(root, div).unwrap();
        let buttons = (0..n)
            .map(|_| {
                let b = doc.tree.create_element("button");
                doc.tree.append_child(div, b).unwrap()
            })
            .collect();
        (doc, div, buttons)
    }

    #[test]
    fn test_bubbling_reaches_window() {
        let (mut doc, div, buttons) = doc_with_buttons(1);
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut subs = Vec::new();
        for target in [EventTarget::Node(buttons[0]), EventTarget::Node(div), EventTarget::Window] {
            let log = Rc::clone(&log);
            subs.push(doc.add_event_listener(target, EventType::Click, move |_, e| {
                log.borrow_mut().push(e.current_target);
            }));
        }

        doc.click(buttons[0]);
        assert_eq!(
            *log.borrow(),
            vec![EventTarget::Node(buttons[0]), EventTarget::Node(div), EventTarget::Window]
        );
    }

    #[test]
    fn test_focus_does_not_bubble_but_focusin_does() {
        let (mut doc, div, buttons) = doc_with_buttons(1);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _a = doc.add_event_listener(div, EventType::Focus, move |_, _| {
            l1.borrow_mut().push("focus")
        });
        let l2 = Rc::clone(&log);
        let _b = doc.add_event_listener(div, EventType::FocusIn, move |_, _| {
            l2.borrow_mut().push("focusin")
        });

        assert!(doc.focus(buttons[0]));
        assert!(!doc.focus(buttons[0]));
        assert_eq!(*log.borrow(), vec!["focusin"]);
        assert_eq!(doc.active_element(), Some(buttons[0]));
    }

    #[test]
    fn test_listener_removed_mid_dispatch_is_skipped() {
        let (mut doc, _, buttons) = doc_with_buttons(1);
        let hits = Rc::new(RefCell::new(0));
        let second: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let victim = Rc::clone(&second);
        let _first = doc.add_event_listener(buttons[0], EventType::Click, move |_, _| {
            victim.borrow_mut().take();
        });
        let counter = Rc::clone(&hits);
        let sub = doc.add_event_listener(buttons[0], EventType::Click, move |_, _| {
            *counter.borrow_mut() += 1;
        });
        *second.borrow_mut() = Some(sub);

        doc.click(buttons[0]);
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_deferred_runs_after_host_task() {
        let (mut doc, _, buttons) = doc_with_buttons(2);
        let target = buttons[1];
        let _sub = doc.add_event_listener(buttons[0], EventType::Click, move |doc, _| {
            doc.defer_focus(target);
            assert_eq!(doc.pending_tasks(), 1);
        });

        doc.click(buttons[0]);
        assert_eq!(doc.pending_tasks(), 0);
        assert_eq!(doc.active_element(), Some(buttons[1]));
    }

    #[test]
    fn test_tab_order_skips_negative_and_hidden() {
        let (mut doc, div, buttons) = doc_with_buttons(4);
        doc.tree.set_attribute(buttons[1], "tabindex", "-1").unwrap();
        doc.tree.set_attribute(buttons[2], "hidden", "").unwrap();
        doc.tree.set_attribute(div, "tabindex", "0").unwrap();

        assert_eq!(doc.tab_order(), vec![div, buttons[0], buttons[3]]);

        doc.focus(buttons[1]);
        doc.press_tab();
        assert_eq!(doc.active_element(), Some(buttons[3]));
        doc.press_shift_tab();
        assert_eq!(doc.active_element(), Some(buttons[0]));
    }

    #[test]
    fn test_generate_id_skips_existing() {
        let (mut doc, _, buttons) = doc_with_buttons(1);
        doc.tree.set_attribute(buttons[0], "id", "tab-1").unwrap();

        assert_eq!(doc.generate_id("tab"), "tab-2");
        assert_eq!(doc.generate_id("tab"), "tab-3");
    }

    #[test]
    fn test_runaway_deferred_queue_is_bounded() {
        fn requeue(doc: &mut Document) {
            doc.defer(requeue);
        }
        let mut doc = Document::new();
        doc.defer(requeue);
        doc.flush();
        assert_eq!(doc.pending_tasks(), 0);
    }
}
