//! Menu
//!
//! A popup list of items. The owner opens and closes the menu and turns
//! keyboard handling on with [`Menu::set_enabled`]; the menu asks to be
//! closed through `request_close` on Escape, Tab or an outside pointer-up.

use std::cell::RefCell;
use std::rc::Rc;

use akit_a11y::aria::attr;
use akit_a11y::NavIntent;
use akit_dom::{Document, Event, EventTarget, EventType, Key, NodeId, Selector, Subscriptions};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::behavior::{Behavior, Wiring};
use crate::callback::DocumentHook;
use crate::nav::{
    apply_selection, element_index, inclusive_query, ApplyOptions, Marker, MarkerTarget, NavItem,
    NavMachine, Transition,
};
use crate::{WidgetError, WidgetResult};

/// Custom event a menubar sends to its menus, `detail` is `open` or `close`
pub const MENU_REQUEST_EVENT: &str = "menubar-menu-request";

/// Selectors shared by menus and menubars
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MenuSelectors {
    /// Interactive part of an item
    pub item: String,
    /// A menu nested in a menubar item
    pub menu: String,
    /// An open menu
    pub open_menu: String,
}

impl Default for MenuSelectors {
    fn default() -> Self {
        Self {
            item: r#"[role="menuitem"]"#.to_string(),
            menu: r#"[role="menu"]"#.to_string(),
            open_menu: r#"[data-open="true"]"#.to_string(),
        }
    }
}

/// Menu options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MenuOptions {
    /// Keyboard handling and dismissal active
    pub enabled: bool,
    pub selectors: MenuSelectors,
    #[serde(skip)]
    pub request_open: Option<DocumentHook>,
    #[serde(skip)]
    pub request_close: Option<DocumentHook>,
}

impl MenuOptions {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn selectors(mut self, selectors: MenuSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    pub fn request_open(mut self, f: impl Fn(&mut Document) + 'static) -> Self {
        self.request_open = Some(DocumentHook::new(f));
        self
    }

    pub fn request_close(mut self, f: impl Fn(&mut Document) + 'static) -> Self {
        self.request_close = Some(DocumentHook::new(f));
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

struct MenuState {
    root: NodeId,
    id: String,
    items: Vec<NavItem>,
    nav: NavMachine,
    request_open: Option<DocumentHook>,
    request_close: Option<DocumentHook>,
}

/// Attached menu
pub struct Menu {
    state: Rc<RefCell<MenuState>>,
    subs: Subscriptions,
}

impl Menu {
    pub fn attach(doc: &mut Document, node: NodeId, options: MenuOptions) -> WidgetResult<Self> {
        let item = Selector::parse(&options.selectors.item)?;
        let button = Selector::parse("button")?;

        let children = doc.tree.element_children(node);
        if children.is_empty() {
            return Err(WidgetError::Empty {
                widget: Self::NAME,
                what: "menu items",
            });
        }
        let items = children
            .into_iter()
            .map(|child| {
                inclusive_query(&doc.tree, child, &item)
                    .or_else(|| inclusive_query(&doc.tree, child, &button))
                    .map(|part| NavItem::new(child, part))
                    .ok_or_else(|| WidgetError::missing(Self::NAME, &options.selectors.item))
            })
            .collect::<WidgetResult<Vec<_>>>()?;

        let id = match doc.tree.get_attribute(node, "id") {
            Some(id) => id.to_string(),
            None => {
                let id = doc.generate_id("menu");
                doc.tree.set_attribute(node, "id", &id)?;
                id
            }
        };

        let count = items.len();
        let mut nav = NavMachine::new(count, false);
        nav.set_armed(options.enabled);
        let state = Rc::new(RefCell::new(MenuState {
            root: node,
            id,
            items,
            nav,
            request_open: options.request_open,
            request_close: options.request_close,
        }));

        let subs = Wiring::new(doc, &state)
            .on(node, EventType::PointerMove, MenuState::on_pointer_move)
            .on(node, EventType::Custom(MENU_REQUEST_EVENT.to_string()), MenuState::on_menu_request)
            .on(EventTarget::Window, EventType::KeyUp, MenuState::on_key_up)
            .on(EventTarget::Window, EventType::KeyDown, MenuState::on_key_down)
            .on(EventTarget::Window, EventType::PointerUp, MenuState::on_pointer_up)
            .finish();

        debug!(%node, count, "menu attached");
        Ok(Self { state, subs })
    }

    /// Turn keyboard handling and dismissal on or off
    pub fn set_enabled(&self, enabled: bool) {
        self.state.borrow_mut().nav.set_armed(enabled);
    }

    pub fn is_enabled(&self) -> bool {
        self.state.borrow().nav.is_armed()
    }

    /// Index of the highlighted item
    pub fn highlighted(&self) -> Option<usize> {
        self.state.borrow().nav.selected()
    }

    /// The menu element's id, generated when the markup has none
    pub fn id(&self) -> String {
        self.state.borrow().id.clone()
    }
}

impl Behavior for Menu {
    const NAME: &'static str = "menu";

    fn destroy(&mut self) {
        if !self.subs.is_empty() {
            debug!(root = %self.state.borrow().root, "menu destroyed");
        }
        self.subs.clear();
    }

    fn is_attached(&self) -> bool {
        !self.subs.is_empty()
    }
}

impl MenuState {
    fn highlight(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        transition: Option<Transition>,
    ) -> WidgetResult<()> {
        let Some(transition) = transition else {
            return Ok(());
        };
        let items = state.borrow().items.clone();
        apply_selection(doc, &items, transition, HIGHLIGHT)
    }

    /// Reset the highlight and ask the owner to close, once per open
    fn dismiss(state: &Rc<RefCell<Self>>, doc: &mut Document) -> WidgetResult<()> {
        let (items, transition, request_close) = {
            let mut s = state.borrow_mut();
            if !s.nav.is_armed() {
                return Ok(());
            }
            (s.items.clone(), s.nav.dismiss(), s.request_close.clone())
        };
        if let Some(transition) = transition {
            apply_selection(doc, &items, transition, ApplyOptions { focus: false, ..HIGHLIGHT })?;
        }
        debug!("menu dismissed");
        if let Some(request_close) = request_close {
            request_close.call(doc);
        }
        Ok(())
    }

    /// First item whose label starts with `c`
    fn find_by_char(doc: &Document, items: &[NavItem], c: char) -> Option<usize> {
        items.iter().position(|item| {
            doc.tree
                .text_content(item.part)
                .trim()
                .chars()
                .next()
                .is_some_and(|first| first.to_lowercase().eq(c.to_lowercase()))
        })
    }

    fn on_key_up(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        let transition = {
            let mut s = state.borrow_mut();
            if !s.nav.is_armed() {
                return Ok(());
            }
            match event.key.as_ref() {
                Some(Key::ArrowDown) => s.nav.intent(NavIntent::Forward),
                Some(Key::ArrowUp) => s.nav.intent(NavIntent::Backward),
                Some(Key::Character(c)) if c.is_alphanumeric() => {
                    match Self::find_by_char(doc, &s.items, *c) {
                        Some(index) => s.nav.select(Some(index)),
                        None => {
                            trace!(%c, "no menu item for key");
                            None
                        }
                    }
                }
                _ => None,
            }
        };
        Self::highlight(state, doc, transition)
    }

    fn on_key_down(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        if event.is_key(&Key::Escape) || event.is_key(&Key::Tab) {
            Self::dismiss(state, doc)?;
        }
        Ok(())
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
            match element_index(&doc.tree, s.root, target) {
                Some(index) => s.nav.select(Some(index)),
                None => None,
            }
        };
        Self::highlight(state, doc, transition)
    }

    fn on_pointer_up(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        let controls_menu = event.target_node().is_some_and(|target| {
            let s = state.borrow();
            doc.tree.get_attribute(target, attr::ARIA_CONTROLS) == Some(s.id.as_str())
        });
        if controls_menu {
            return Ok(());
        }
        Self::dismiss(state, doc)
    }

    fn on_menu_request(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        if event.detail.as_deref() == Some("open") {
            let request_open = state.borrow().request_open.clone();
            if let Some(request_open) = request_open {
                debug!("menu open requested");
                request_open.call(doc);
            }
            return Ok(());
        }
        Self::dismiss(state, doc)
    }
}
