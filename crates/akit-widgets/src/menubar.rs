//! Menubar
//!
//! A row (or column) of items, each usually owning a nested menu. While
//! one menu is open, moving the highlight opens the highlighted item's
//! menu and closes the others through [`MENU_REQUEST_EVENT`].

use std::cell::RefCell;
use std::rc::Rc;

use akit_a11y::aria::attr;
use akit_a11y::{Axis, Orientation, TabIndex};
use akit_dom::{Document, Event, EventTarget, EventType, Key, NodeId, Selector, Subscriptions};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::behavior::{Behavior, Wiring};
use crate::menu::{MenuSelectors, MENU_REQUEST_EVENT};
use crate::nav::{
    apply_selection, element_index, inclusive_query, ApplyOptions, Marker, MarkerTarget, NavItem,
    NavMachine, Transition,
};
use crate::{WidgetError, WidgetResult};

pub type MenubarSelectors = MenuSelectors;

/// Menubar options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MenubarOptions {
    pub direction: Orientation,
    pub selectors: MenubarSelectors,
}

impl MenubarOptions {
    pub fn direction(mut self, direction: Orientation) -> Self {
        self.direction = direction;
        self
    }

    pub fn selectors(mut self, selectors: MenubarSelectors) -> Self {
        self.selectors = selectors;
        self
    }
}

const HIGHLIGHT: ApplyOptions = ApplyOptions {
    marker: Marker::Flag(attr::DATA_HIGHLIGHTED),
    marker_on: MarkerTarget::Item,
    roving: false,
    exclusive_panels: false,
    focus: true,
};

struct MenubarState {
    root: NodeId,
    items: Vec<NavItem>,
    axis: Axis,
    menu: Selector,
    open_menu: Selector,
    nav: NavMachine,
}

/// Attached menubar
pub struct Menubar {
    state: Rc<RefCell<MenubarState>>,
    subs: Subscriptions,
}

impl Menubar {
    pub fn attach(doc: &mut Document, node: NodeId, options: MenubarOptions) -> WidgetResult<Self> {
        let item = Selector::parse(&options.selectors.item)?;
        let menu = Selector::parse(&options.selectors.menu)?;
        let open_menu = Selector::parse(&options.selectors.open_menu)?;

        let children = doc.tree.element_children(node);
        if children.is_empty() {
            return Err(WidgetError::Empty {
                widget: Self::NAME,
                what: "menubar items",
            });
        }
        let items = children
            .into_iter()
            .map(|child| {
                inclusive_query(&doc.tree, child, &item)
                    .map(|part| NavItem::new(child, part))
                    .ok_or_else(|| WidgetError::missing(Self::NAME, &options.selectors.item))
            })
            .collect::<WidgetResult<Vec<_>>>()?;
        for (index, item) in items.iter().enumerate() {
            doc.tree
                .set_attribute(item.part, attr::TABINDEX, &TabIndex::roving(index == 0).as_attr())?;
        }

        let count = items.len();
        let state = Rc::new(RefCell::new(MenubarState {
            root: node,
            items,
            axis: options.direction.into(),
            menu,
            open_menu,
            nav: NavMachine::new(count, true).with_selected(Some(0)),
        }));

        let subs = Wiring::new(doc, &state)
            .on(node, EventType::Click, MenubarState::on_click)
            .on(node, EventType::FocusIn, MenubarState::on_focus_in)
            .on(node, EventType::PointerMove, MenubarState::on_pointer_move)
            .on(EventTarget::Window, EventType::PointerUp, MenubarState::on_pointer_up)
            .on(EventTarget::Window, EventType::KeyDown, MenubarState::on_key_down)
            .on(EventTarget::Window, EventType::KeyUp, MenubarState::on_key_up)
            .finish();

        debug!(%node, count, "menubar attached");
        Ok(Self { state, subs })
    }

    /// Index of the highlighted item
    pub fn highlighted(&self) -> Option<usize> {
        self.state.borrow().nav.selected()
    }

    pub fn is_armed(&self) -> bool {
        self.state.borrow().nav.is_armed()
    }
}

impl Behavior for Menubar {
    const NAME: &'static str = "menubar";

    fn destroy(&mut self) {
        if !self.subs.is_empty() {
            debug!(root = %self.state.borrow().root, "menubar destroyed");
        }
        self.subs.clear();
    }

    fn is_attached(&self) -> bool {
        !self.subs.is_empty()
    }
}

impl MenubarState {
    fn has_open_menu(&self, doc: &Document) -> bool {
        doc.tree.query_first(self.root, &self.open_menu).is_some()
    }

    /// Highlight, focus, and hand an open menu over to the new item
    fn update(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        transition: Option<Transition>,
    ) -> WidgetResult<()> {
        let Some(transition) = transition else {
            return Ok(());
        };
        let (items, requests) = {
            let s = state.borrow();
            let requests: Vec<(NodeId, bool)> = if s.has_open_menu(doc) {
                let current = transition
                    .selected
                    .and_then(|i| s.items.get(i))
                    .and_then(|item| doc.tree.query_first(item.node, &s.menu));
                doc.tree
                    .query_all(s.root, &s.menu)
                    .into_iter()
                    .map(|menu| (menu, Some(menu) == current))
                    .collect()
            } else {
                Vec::new()
            };
            (s.items.clone(), requests)
        };

        apply_selection(doc, &items, transition, HIGHLIGHT)?;
        for (menu, open) in requests {
            let detail = if open { "open" } else { "close" };
            trace!(%menu, detail, "menu request");
            doc.dispatch(Event::custom(MENU_REQUEST_EVENT, menu, Some(detail)));
        }
        Ok(())
    }

    fn on_click(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        let Some(target) = event.target_node() else {
            return Ok(());
        };
        let transition = {
            let mut s = state.borrow_mut();
            match element_index(&doc.tree, s.root, target) {
                Some(index) => s.nav.pick(index),
                None => None,
            }
        };
        Self::update(state, doc, transition)
    }

    fn on_focus_in(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        let transition = {
            let mut s = state.borrow_mut();
            if s.nav.is_armed() {
                return Ok(());
            }
            s.nav.arm(None)
        };
        Self::update(state, doc, transition)
    }

    fn on_pointer_move(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        let Some(target) = event.target_node() else {
            return Ok(());
        };
        let transition = {
            let mut s = state.borrow_mut();
            if !s.nav.is_armed() || !s.has_open_menu(doc) {
                return Ok(());
            }
            match element_index(&doc.tree, s.root, target) {
                Some(index) => s.nav.select(Some(index)),
                None => None,
            }
        };
        Self::update(state, doc, transition)
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
        _doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        if event.is_key(&Key::Tab) {
            state.borrow_mut().nav.disarm();
        }
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
        Self::update(state, doc, transition)
    }
}
