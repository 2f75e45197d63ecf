//! Edge case tests for akit-dom
//!
//! Detached nodes, deep trees, re-entrant dispatch and listener teardown.

use std::cell::RefCell;
use std::rc::Rc;

use akit_dom::{
    Document, DomError, DomTree, Event, EventTarget, EventType, Key, NodeId, Subscriptions,
};

// ============================================================================
// TREE EDGE CASES
// ============================================================================

#[test]
fn test_deep_tree_contains_and_ancestors() {
    let mut tree = DomTree::new();
    let mut parent = tree.root();
    let mut chain = Vec::new();
    for _ in 0..500 {
        let child = tree.create_element("div");
        tree.append_child(parent, child).unwrap();
        chain.push(child);
        parent = child;
    }

    let deepest = *chain.last().unwrap();
    assert!(tree.contains(chain[0], deepest));
    assert!(!tree.contains(deepest, chain[0]));
    assert_eq!(tree.ancestors(deepest).count(), 500);
}

#[test]
fn test_detached_node_queries() {
    let mut tree = DomTree::new();
    let orphan = tree.create_element("span");

    assert_eq!(tree.parent(orphan), None);
    assert_eq!(tree.ancestors(orphan).count(), 0);
    assert_eq!(tree.get_element_by_id("nope"), None);
    assert!(tree.descendants(orphan).is_empty());
}

#[test]
fn test_unknown_node_errors() {
    let mut tree = DomTree::new();
    let bogus = tree.create_element("div");
    let other = DomTree::new();

    assert!(other.get(bogus).is_none());
    assert!(!other.is_element(bogus));
    assert!(matches!(
        DomTree::new().append_child(NodeId::ROOT, bogus),
        Err(DomError::NotFound(_))
    ));
}

#[test]
fn test_invalid_selector_surfaces_error() {
    let tree = DomTree::new();
    let err = tree.query_selector(tree.root(), "ul > li").unwrap_err();
    assert!(err.to_string().contains("ul > li"));
}

// ============================================================================
// DISPATCH EDGE CASES
// ============================================================================

#[test]
fn test_nested_dispatch_from_listener() {
    let mut doc = Document::new();
    let root = doc.tree.root();
    let a = doc.tree.create_element("div");
    let b = doc.tree.create_element("div");
    doc.tree.append_child(root, a).unwrap();
    doc.tree.append_child(root, b).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut subs = Subscriptions::new();

    subs.push(doc.add_event_listener(a, EventType::Click, move |doc, _| {
        doc.dispatch(Event::custom("poke", b, Some("open")));
    }));
    let log = Rc::clone(&seen);
    subs.push(doc.add_event_listener(b, EventType::parse("poke"), move |_, e| {
        log.borrow_mut().push(e.detail.clone());
    }));

    doc.click(a);
    assert_eq!(*seen.borrow(), vec![Some("open".to_string())]);

    subs.clear();
    assert_eq!(doc.listener_count(), 0);
    doc.click(a);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_stop_propagation_keeps_window_quiet() {
    let mut doc = Document::new();
    let root = doc.tree.root();
    let button = doc.tree.create_element("button");
    doc.tree.append_child(root, button).unwrap();

    let window_hits = Rc::new(RefCell::new(0));
    let hits = Rc::clone(&window_hits);
    let _w = doc.add_event_listener(EventTarget::Window, EventType::KeyUp, move |_, _| {
        *hits.borrow_mut() += 1;
    });
    let _s = doc.add_event_listener(button, EventType::KeyUp, |_, e| e.stop_propagation());

    doc.focus(button);
    doc.press(Key::Enter);
    assert_eq!(*window_hits.borrow(), 0);

    doc.blur();
    doc.press(Key::Enter);
    assert_eq!(*window_hits.borrow(), 1);
}

#[test]
fn test_prevented_tab_keeps_focus() {
    let mut doc = Document::new();
    let root = doc.tree.root();
    let first = doc.tree.create_element("button");
    let second = doc.tree.create_element("button");
    doc.tree.append_child(root, first).unwrap();
    doc.tree.append_child(root, second).unwrap();

    let _s = doc.add_event_listener(first, EventType::KeyDown, |_, e| {
        if e.is_key(&Key::Tab) {
            e.prevent_default();
        }
    });

    doc.focus(first);
    doc.press_tab();
    assert_eq!(doc.active_element(), Some(first));
}

#[test]
fn test_tab_past_last_element_blurs() {
    let mut doc = Document::new();
    let root = doc.tree.root();
    let only = doc.tree.create_element("button");
    doc.tree.append_child(root, only).unwrap();

    doc.focus(only);
    doc.press_tab();
    assert_eq!(doc.active_element(), None);
}
