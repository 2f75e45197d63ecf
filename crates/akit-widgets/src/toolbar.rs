//! Toolbar
//!
//! Every button under the container is an item, however deeply nested.

use std::cell::RefCell;
use std::rc::Rc;

use akit_a11y::aria::attr;
use akit_a11y::Orientation;
use akit_dom::{Document, NodeId, Subscriptions};
use serde::Deserialize;
use tracing::debug;

use crate::behavior::Behavior;
use crate::nav::NavItem;
use crate::roving::{Lookup, RovingGroup};
use crate::{WidgetError, WidgetResult};

/// Toolbar options
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolbarOptions {
    /// Accessible name written to `aria-label`
    pub label: String,
    pub orientation: Orientation,
}

impl ToolbarOptions {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }
}

/// Attached toolbar
pub struct Toolbar {
    state: Rc<RefCell<RovingGroup>>,
    subs: Subscriptions,
}

impl Toolbar {
    pub fn attach(doc: &mut Document, node: NodeId, options: ToolbarOptions) -> WidgetResult<Self> {
        let buttons = doc.tree.query_selector_all(node, "button")?;
        if buttons.is_empty() {
            return Err(WidgetError::Empty {
                widget: Self::NAME,
                what: "buttons",
            });
        }

        doc.tree.set_attributes(
            node,
            [
                (attr::ARIA_ORIENTATION, options.orientation.as_str()),
                (attr::ARIA_LABEL, options.label.as_str()),
            ],
        )?;

        let items: Vec<NavItem> = buttons.iter().map(|&b| NavItem::new(b, b)).collect();
        let (state, subs) =
            RovingGroup::attach(doc, node, items, options.orientation.into(), Lookup::Part)?;

        debug!(%node, count = buttons.len(), "toolbar attached");
        Ok(Self { state, subs })
    }

    /// Index of the button holding the tab stop
    pub fn selected(&self) -> Option<usize> {
        self.state.borrow().nav.selected()
    }

    pub fn is_armed(&self) -> bool {
        self.state.borrow().nav.is_armed()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().items.is_empty()
    }
}

impl Behavior for Toolbar {
    const NAME: &'static str = "toolbar";

    fn destroy(&mut self) {
        if !self.subs.is_empty() {
            debug!(root = %self.state.borrow().root, "toolbar destroyed");
        }
        self.subs.clear();
    }

    fn is_attached(&self) -> bool {
        !self.subs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akit_dom::Key;

    const MARKUP: &str = r#"
        <div role="toolbar">
          <div class="group"><button>Cut</button><button>Copy</button></div>
          <span class="sep"></span>
          <div class="group"><button><em>Paste</em></button></div>
        </div>"#;

    fn attach(options: ToolbarOptions) -> (Document, Toolbar, NodeId, Vec<NodeId>) {
        let (mut doc, root) = akit_html::parse_fragment(MARKUP).unwrap();
        let toolbar = Toolbar::attach(&mut doc, root, options).unwrap();
        let buttons = doc.tree.query_selector_all(root, "button").unwrap();
        (doc, toolbar, root, buttons)
    }

    #[test]
    fn test_setup() {
        let (doc, toolbar, root, buttons) = attach(ToolbarOptions::default().label("Edit"));

        assert_eq!(toolbar.len(), 3);
        assert_eq!(doc.tree.get_attribute(root, "aria-label"), Some("Edit"));
        assert_eq!(doc.tree.get_attribute(root, "aria-orientation"), Some("horizontal"));
        assert_eq!(doc.tree.get_attribute(root, "tabindex"), Some("0"));
        assert_eq!(doc.tree.get_attribute(buttons[0], "tabindex"), Some("0"));
        assert_eq!(doc.tree.get_attribute(buttons[1], "tabindex"), Some("-1"));
    }

    #[test]
    fn test_nested_buttons_navigate() {
        let (mut doc, toolbar, _, buttons) = attach(ToolbarOptions::default());

        doc.focus(buttons[0]);
        doc.key_up(Key::ArrowRight);
        doc.key_up(Key::ArrowRight);
        assert_eq!(toolbar.selected(), Some(2));
        assert_eq!(doc.active_element(), Some(buttons[2]));
        doc.key_up(Key::ArrowRight);
        assert_eq!(toolbar.selected(), Some(0));
    }

    #[test]
    fn test_click_moves_tab_stop() {
        let (mut doc, toolbar, _, buttons) = attach(ToolbarOptions::default());

        doc.click(buttons[2]);
        assert_eq!(toolbar.selected(), Some(2));
        assert_eq!(doc.tree.get_attribute(buttons[2], "tabindex"), Some("0"));
    }

    #[test]
    fn test_vertical_ignores_horizontal_arrows() {
        let (mut doc, toolbar, root, _) =
            attach(ToolbarOptions::default().orientation(Orientation::Vertical));

        assert_eq!(doc.tree.get_attribute(root, "aria-orientation"), Some("vertical"));
        doc.focus(root);
        doc.key_up(Key::ArrowRight);
        assert_eq!(toolbar.selected(), Some(0));
        doc.key_up(Key::ArrowDown);
        assert_eq!(toolbar.selected(), Some(1));
    }

    #[test]
    fn test_requires_buttons() {
        let (mut doc, root) = akit_html::parse_fragment("<div><span>x</span></div>").unwrap();

        assert!(matches!(
            Toolbar::attach(&mut doc, root, ToolbarOptions::default()),
            Err(WidgetError::Empty { widget: "toolbar", .. })
        ));
    }
}
