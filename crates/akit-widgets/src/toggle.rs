//! Toggle and toggle group
//!
//! A toggle is a button flipping `aria-pressed`. A toggle group is a
//! single tab stop over several toggles with arrow-key focus movement.

use std::cell::RefCell;
use std::rc::Rc;

use akit_a11y::aria::attr;
use akit_a11y::Orientation;
use akit_dom::{Document, Event, EventType, NodeId, Selector, Subscriptions};
use serde::Deserialize;
use tracing::debug;

use crate::behavior::{Behavior, Wiring};
use crate::callback::{emit, Callback};
use crate::nav::{inclusive_query, NavItem};
use crate::roving::{Lookup, RovingGroup};
use crate::{WidgetError, WidgetResult};

/// Toggle options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToggleOptions {
    pub pressed: bool,
    #[serde(skip)]
    pub on_change: Option<Callback<bool>>,
}

impl ToggleOptions {
    pub fn pressed(mut self, pressed: bool) -> Self {
        self.pressed = pressed;
        self
    }

    /// Called with the new pressed state after a click
    pub fn on_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_change = Some(Callback::new(f));
        self
    }
}

struct ToggleState {
    node: NodeId,
    pressed: bool,
    on_change: Option<Callback<bool>>,
}

/// Attached toggle button
pub struct Toggle {
    state: Rc<RefCell<ToggleState>>,
    subs: Subscriptions,
}

impl Toggle {
    pub fn attach(doc: &mut Document, node: NodeId, options: ToggleOptions) -> WidgetResult<Self> {
        doc.tree
            .set_attribute(node, attr::ARIA_PRESSED, &options.pressed.to_string())?;
        let state = Rc::new(RefCell::new(ToggleState {
            node,
            pressed: options.pressed,
            on_change: options.on_change,
        }));
        let subs = Wiring::new(doc, &state)
            .on(node, EventType::Click, ToggleState::on_click)
            .finish();

        debug!(%node, pressed = options.pressed, "toggle attached");
        Ok(Self { state, subs })
    }

    pub fn is_pressed(&self) -> bool {
        self.state.borrow().pressed
    }

    /// Set the pressed state from outside; not reported
    pub fn set_pressed(&self, doc: &mut Document, pressed: bool) -> WidgetResult<()> {
        let mut s = self.state.borrow_mut();
        s.pressed = pressed;
        doc.tree.set_attribute(s.node, attr::ARIA_PRESSED, &pressed.to_string())?;
        Ok(())
    }
}

impl Behavior for Toggle {
    const NAME: &'static str = "toggle";

    fn destroy(&mut self) {
        self.subs.clear();
    }

    fn is_attached(&self) -> bool {
        !self.subs.is_empty()
    }
}

impl ToggleState {
    fn on_click(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        let (pressed, on_change) = {
            let mut s = state.borrow_mut();
            s.pressed = !s.pressed;
            doc.tree.set_attribute(s.node, attr::ARIA_PRESSED, &s.pressed.to_string())?;
            (s.pressed, s.on_change.clone())
        };
        emit(on_change, pressed);
        Ok(())
    }
}

/// Toggle group options
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToggleGroupOptions {
    pub orientation: Orientation,
}

impl ToggleGroupOptions {
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }
}

/// Attached toggle group
pub struct ToggleGroup {
    state: Rc<RefCell<RovingGroup>>,
    subs: Subscriptions,
}

impl ToggleGroup {
    pub fn attach(
        doc: &mut Document,
        node: NodeId,
        options: ToggleGroupOptions,
    ) -> WidgetResult<Self> {
        let pressable = Selector::parse("[aria-pressed]")?;
        let children = doc.tree.element_children(node);
        if children.is_empty() {
            return Err(WidgetError::Empty {
                widget: Self::NAME,
                what: "toggles",
            });
        }

        let items = children
            .into_iter()
            .map(|child| {
                inclusive_query(&doc.tree, child, &pressable)
                    .map(|part| NavItem::new(child, part))
                    .ok_or_else(|| WidgetError::missing(Self::NAME, "[aria-pressed]"))
            })
            .collect::<WidgetResult<Vec<_>>>()?;

        let count = items.len();
        let (state, subs) =
            RovingGroup::attach(doc, node, items, options.orientation.into(), Lookup::Child)?;
        debug!(%node, count, "toggle group attached");
        Ok(Self { state, subs })
    }

    /// Index of the item holding the tab stop
    pub fn selected(&self) -> Option<usize> {
        self.state.borrow().nav.selected()
    }

    pub fn is_armed(&self) -> bool {
        self.state.borrow().nav.is_armed()
    }
}

impl Behavior for ToggleGroup {
    const NAME: &'static str = "toggle group";

    fn destroy(&mut self) {
        if !self.subs.is_empty() {
            debug!(root = %self.state.borrow().root, "toggle group destroyed");
        }
        self.subs.clear();
    }

    fn is_attached(&self) -> bool {
        !self.subs.is_empty()
    }
}
