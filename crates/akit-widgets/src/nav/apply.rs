//! Selection applier
//!
//! Writes a selection into the markup: the highlight/selected marker,
//! roving tab indexes, exclusive panel state and the deferred focus move.

use akit_a11y::aria::attr;
use akit_a11y::{set_roving_tabindex, DataState, TabIndex};
use akit_dom::{AttrValue, Document, DomResult, DomTree, NodeId};
use tracing::{debug, warn};

use super::Transition;
use crate::WidgetResult;

/// How the selected item is marked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    /// Present on the selected item, absent elsewhere (`data-highlighted`)
    Flag(&'static str),
    /// `"true"` on the selected item, `"false"` elsewhere (`aria-selected`)
    Bool(&'static str),
}

/// Which node of an item carries the marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkerTarget {
    #[default]
    Item,
    Part,
}

/// Per-widget applier configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    pub marker: Marker,
    pub marker_on: MarkerTarget,
    /// Rewrite `tabindex` on the parts
    pub roving: bool,
    /// Open the selected item's panel and close every other one
    pub exclusive_panels: bool,
    /// Move focus to the selected part once the current input settles
    pub focus: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            marker: Marker::None,
            marker_on: MarkerTarget::Item,
            roving: false,
            exclusive_panels: false,
            focus: true,
        }
    }
}

/// One navigable entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    /// The item itself (usually a direct child of the container)
    pub node: NodeId,
    /// Interactive part that receives focus
    pub part: NodeId,
    /// Panel shown while the item is selected
    pub panel: Option<NodeId>,
}

impl NavItem {
    pub fn new(node: NodeId, part: NodeId) -> Self {
        Self { node, part, panel: None }
    }

    pub fn with_panel(mut self, panel: NodeId) -> Self {
        self.panel = Some(panel);
        self
    }
}

/// Apply a selection change to `items`
///
/// Every unselected item loses the marker, which covers the previous
/// one. With nothing selected only the marker is cleared.
pub fn apply_selection(
    doc: &mut Document,
    items: &[NavItem],
    transition: Transition,
    options: ApplyOptions,
) -> WidgetResult<()> {
    let selected = transition.selected.filter(|&i| i < items.len());
    debug!(previous = ?transition.previous, ?selected, "apply selection");

    let tree = &mut doc.tree;
    for (index, item) in items.iter().enumerate() {
        let is_selected = Some(index) == selected;
        let target = match options.marker_on {
            MarkerTarget::Item => item.node,
            MarkerTarget::Part => item.part,
        };
        match options.marker {
            Marker::None => {}
            Marker::Flag(name) => {
                tree.toggle_attribute(target, name, Some(is_selected))?;
            }
            Marker::Bool(name) => {
                tree.set_attributes(target, [(name, AttrValue::Str(is_selected.to_string()))])?;
            }
        }
    }

    let Some(selected) = selected else {
        return Ok(());
    };

    if options.roving {
        let parts: Vec<NodeId> = items.iter().map(|i| i.part).collect();
        set_roving_tabindex(tree, &parts, Some(selected))?;
    }

    if options.exclusive_panels {
        for (index, item) in items.iter().enumerate() {
            if let Some(panel) = item.panel {
                set_disclosure(tree, panel, panel, None, index == selected)?;
            }
        }
    }

    if options.focus {
        doc.defer_focus(items[selected].part);
    }
    Ok(())
}

/// Open or close one disclosure
///
/// `data-state` goes on `state`, `hidden` on `panel` and, when given,
/// `aria-expanded` on `trigger`.
pub fn set_disclosure(
    tree: &mut DomTree,
    state: NodeId,
    panel: NodeId,
    trigger: Option<NodeId>,
    open: bool,
) -> DomResult<()> {
    tree.set_attribute(state, attr::DATA_STATE, DataState::open(open).as_str())?;
    tree.toggle_attribute(panel, attr::HIDDEN, Some(!open))?;
    if let Some(trigger) = trigger {
        tree.set_attribute(trigger, attr::ARIA_EXPANDED, &open.to_string())?;
    }
    Ok(())
}

/// Take `node` out of the tab order until the current input settles
///
/// Lets Tab / Shift+Tab leave a composite widget instead of landing on
/// its container.
pub fn suspend_tab_stop(doc: &mut Document, node: NodeId) -> DomResult<()> {
    doc.tree
        .set_attribute(node, attr::TABINDEX, &TabIndex::NotFocusable.as_attr())?;
    doc.defer(move |doc| {
        let restored = doc.tree.set_attribute(node, attr::TABINDEX, &TabIndex::IN_ORDER.as_attr());
        if let Err(err) = restored {
            warn!(%err, "failed to restore tab stop");
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(n: usize) -> (Document, Vec<NavItem>) {
        let mut doc = Document::new();
        let root = doc.tree.root();
        let list = doc.tree.create_element("div");
        doc.tree.append_child(root, list).unwrap();

        let items = (0..n)
            .map(|_| {
                let node = doc.tree.create_element("div");
                let part = doc.tree.create_element("button");
                let panel = doc.tree.create_element("section");
                doc.tree.append_child(list, node).unwrap();
                doc.tree.append_child(node, part).unwrap();
                doc.tree.append_child(root, panel).unwrap();
                NavItem::new(node, part).with_panel(panel)
            })
            .collect();
        (doc, items)
    }

    #[test]
    fn test_flag_marker_moves() {
        let (mut doc, items) = setup(3);
        let options = ApplyOptions {
            marker: Marker::Flag("data-highlighted"),
            focus: false,
            ..ApplyOptions::default()
        };

        let first = Transition { previous: None, selected: Some(0) };
        apply_selection(&mut doc, &items, first, options).unwrap();
        let last = Transition { previous: Some(0), selected: Some(2) };
        apply_selection(&mut doc, &items, last, options).unwrap();

        let flagged: Vec<bool> = items
            .iter()
            .map(|i| doc.tree.has_attribute(i.node, "data-highlighted"))
            .collect();
        assert_eq!(flagged, vec![false, false, true]);

        let cleared = Transition { previous: Some(2), selected: None };
        apply_selection(&mut doc, &items, cleared, options).unwrap();
        assert!(items.iter().all(|i| !doc.tree.has_attribute(i.node, "data-highlighted")));
    }

    #[test]
    fn test_bool_marker_roving_panels_and_focus() {
        let (mut doc, items) = setup(3);
        let options = ApplyOptions {
            marker: Marker::Bool("aria-selected"),
            marker_on: MarkerTarget::Part,
            roving: true,
            exclusive_panels: true,
            focus: true,
        };

        let second = Transition { previous: None, selected: Some(1) };
        apply_selection(&mut doc, &items, second, options).unwrap();
        doc.flush();

        let selected: Vec<_> =
            items.iter().map(|i| doc.tree.get_attribute(i.part, "aria-selected")).collect();
        assert_eq!(selected, vec![Some("false"), Some("true"), Some("false")]);

        let tabindex: Vec<_> =
            items.iter().map(|i| doc.tree.get_attribute(i.part, "tabindex")).collect();
        assert_eq!(tabindex, vec![Some("-1"), Some("0"), Some("-1")]);

        let open: Vec<bool> = items
            .iter()
            .map(|i| !doc.tree.has_attribute(i.panel.unwrap(), "hidden"))
            .collect();
        assert_eq!(open, vec![false, true, false]);
        assert_eq!(doc.active_element(), Some(items[1].part));
    }

    #[test]
    fn test_suspend_tab_stop_restores() {
        let (mut doc, items) = setup(1);
        let node = items[0].node;

        suspend_tab_stop(&mut doc, node).unwrap();
        assert_eq!(doc.tree.get_attribute(node, "tabindex"), Some("-1"));
        doc.flush();
        assert_eq!(doc.tree.get_attribute(node, "tabindex"), Some("0"));
    }
}
