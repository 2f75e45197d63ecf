//! Roving tab stop group
//!
//! Shared by toggle groups and toolbars: the container is one tab stop,
//! arrows along the axis move focus between parts, Tab leaves.

use std::cell::RefCell;
use std::rc::Rc;

use akit_a11y::aria::attr;
use akit_a11y::{Axis, TabIndex};
use akit_dom::{Document, Event, EventTarget, EventType, Key, NodeId, Subscriptions};

use crate::behavior::Wiring;
use crate::nav::{
    apply_selection, element_index, item_index, suspend_tab_stop, ApplyOptions, NavItem, NavMachine,
    Transition,
};
use crate::WidgetResult;

const ROVING: ApplyOptions = ApplyOptions {
    marker: crate::nav::Marker::None,
    marker_on: crate::nav::MarkerTarget::Part,
    roving: true,
    exclusive_panels: false,
    focus: true,
};

/// How an event target maps back to an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup {
    /// Items are the container's element children
    Child,
    /// Items are arbitrary descendants; match the nearest part
    Part,
}

pub(crate) struct RovingGroup {
    pub(crate) root: NodeId,
    pub(crate) items: Vec<NavItem>,
    axis: Axis,
    lookup: Lookup,
    pub(crate) nav: NavMachine,
}

impl RovingGroup {
    /// Write the initial tab stops and register the listeners
    pub(crate) fn attach(
        doc: &mut Document,
        root: NodeId,
        items: Vec<NavItem>,
        axis: Axis,
        lookup: Lookup,
    ) -> WidgetResult<(Rc<RefCell<Self>>, Subscriptions)> {
        doc.tree
            .set_attribute(root, attr::TABINDEX, &TabIndex::IN_ORDER.as_attr())?;
        let parts: Vec<NodeId> = items.iter().map(|i| i.part).collect();
        akit_a11y::set_roving_tabindex(&mut doc.tree, &parts, Some(0))?;

        let count = items.len();
        let state = Rc::new(RefCell::new(Self {
            root,
            items,
            axis,
            lookup,
            nav: NavMachine::new(count, true).with_selected(Some(0)),
        }));

        let subs = Wiring::new(doc, &state)
            .on(root, EventType::FocusIn, Self::on_focus_in)
            .on(root, EventType::Click, Self::on_click)
            .on(EventTarget::Window, EventType::PointerUp, Self::on_pointer_up)
            .on(EventTarget::Window, EventType::KeyDown, Self::on_key_down)
            .on(EventTarget::Window, EventType::KeyUp, Self::on_key_up)
            .finish();
        Ok((state, subs))
    }

    fn index_of(&self, doc: &Document, node: NodeId) -> Option<usize> {
        match self.lookup {
            Lookup::Child => element_index(&doc.tree, self.root, node),
            Lookup::Part => {
                let parts: Vec<NodeId> = self.items.iter().map(|i| i.part).collect();
                item_index(&doc.tree, &parts, self.root, node)
            }
        }
    }

    fn apply(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        transition: Option<Transition>,
    ) -> WidgetResult<()> {
        let Some(transition) = transition else {
            return Ok(());
        };
        let items = state.borrow().items.clone();
        apply_selection(doc, &items, transition, ROVING)
    }

    fn on_focus_in(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        let transition = {
            let mut s = state.borrow_mut();
            let index = event.target_node().and_then(|target| s.index_of(doc, target));
            s.nav.arm(Some(index.unwrap_or(0)))
        };
        Self::apply(state, doc, transition)
    }

    fn on_click(
        state: &Rc<RefCell<Self>>,
        _doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        state.borrow_mut().nav.set_armed(true);
        Ok(())
    }

    fn on_pointer_up(
        state: &Rc<RefCell<Self>>,
        _doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        state.borrow_mut().nav.disarm();
        Ok(())
    }

    fn on_key_down(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        if !event.is_key(&Key::Tab) {
            return Ok(());
        }
        let root = {
            let mut s = state.borrow_mut();
            if !s.nav.is_armed() {
                return Ok(());
            }
            s.nav.disarm();
            s.root
        };
        suspend_tab_stop(doc, root)?;
        Ok(())
    }

    fn on_key_up(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        let transition = {
            let mut s = state.borrow_mut();
            let Some(intent) = event.key.as_ref().and_then(|key| s.axis.intent(key)) else {
                return Ok(());
            };
            s.nav.intent(intent)
        };
        Self::apply(state, doc, transition)
    }
}
