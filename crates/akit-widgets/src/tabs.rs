//! Tabs
//!
//! A `[role="tablist"]` whose element children are tabs, each paired
//! with a `[role="tabpanel"]` by `data-value` (or by position). Exactly
//! one panel is open at any time.

use std::cell::RefCell;
use std::rc::Rc;

use akit_a11y::aria::attr;
use akit_a11y::{AriaRole, Axis, DataState, Orientation, TabIndex};
use akit_dom::{Document, Event, EventTarget, EventType, Key, NodeId, Subscriptions};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::behavior::{Behavior, Wiring};
use crate::callback::{emit, Callback};
use crate::error::require;
use crate::nav::{
    apply_selection, element_index, suspend_tab_stop, ApplyOptions, Marker, MarkerTarget, NavItem,
    NavMachine, Transition,
};
use crate::{WidgetError, WidgetResult};

/// Tabs options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TabsOptions {
    /// Value of the tab selected on attach; the first tab when unset
    pub value: Option<String>,
    pub orientation: Orientation,
    #[serde(skip)]
    pub on_change: Option<Callback<String>>,
}

impl TabsOptions {
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Called with the newly selected tab's value
    pub fn on_change(mut self, f: impl Fn(String) + 'static) -> Self {
        self.on_change = Some(Callback::new(f));
        self
    }
}

const APPLY: ApplyOptions = ApplyOptions {
    marker: Marker::Bool(attr::ARIA_SELECTED),
    marker_on: MarkerTarget::Part,
    roving: true,
    exclusive_panels: true,
    focus: true,
};

struct TabsState {
    tablist: NodeId,
    items: Vec<NavItem>,
    values: Vec<String>,
    axis: Axis,
    nav: NavMachine,
    on_change: Option<Callback<String>>,
}

/// Attached tabs
pub struct Tabs {
    state: Rc<RefCell<TabsState>>,
    subs: Subscriptions,
}

/// `data-value`, else the position
fn item_value(doc: &Document, node: NodeId, index: usize) -> String {
    doc.tree
        .get_attribute(node, attr::DATA_VALUE)
        .map_or_else(|| index.to_string(), str::to_string)
}

impl Tabs {
    pub fn attach(doc: &mut Document, node: NodeId, options: TabsOptions) -> WidgetResult<Self> {
        let tablist = require(&doc.tree, node, &AriaRole::TabList.selector(), Self::NAME)?;
        let tabs = doc.tree.element_children(tablist);
        if tabs.is_empty() {
            return Err(WidgetError::Empty {
                widget: Self::NAME,
                what: "tabs",
            });
        }
        let panels = doc.tree.query_selector_all(node, &AriaRole::TabPanel.selector())?;

        let mut items = Vec::with_capacity(tabs.len());
        let mut values = Vec::with_capacity(tabs.len());
        for (index, &tab) in tabs.iter().enumerate() {
            let panel = match doc.tree.get_attribute(tab, attr::DATA_VALUE) {
                Some(value) => panels
                    .iter()
                    .copied()
                    .find(|&p| doc.tree.get_attribute(p, attr::DATA_VALUE) == Some(value)),
                None => panels.get(index).copied(),
            }
            .ok_or(WidgetError::MissingPanel {
                widget: Self::NAME,
                index,
            })?;
            values.push(item_value(doc, tab, index));
            items.push(NavItem::new(tab, tab).with_panel(panel));
        }

        let selected = options
            .value
            .as_deref()
            .and_then(|v| values.iter().position(|value| value == v))
            .unwrap_or(0);

        doc.tree.set_attributes(
            tablist,
            [
                (attr::TABINDEX, TabIndex::IN_ORDER.as_attr()),
                (attr::ARIA_ORIENTATION, options.orientation.as_str().to_string()),
            ],
        )?;
        for (index, item) in items.iter().enumerate() {
            let tab_id = doc.generate_id("tabs-tab");
            let panel_id = doc.generate_id("tabs-panel");
            let open = index == selected;
            let panel = item.panel.unwrap_or(item.node);

            doc.tree.set_attributes(
                item.part,
                [
                    ("id", tab_id.clone()),
                    (attr::ARIA_CONTROLS, panel_id.clone()),
                    (attr::ARIA_SELECTED, open.to_string()),
                    (attr::TABINDEX, TabIndex::roving(open).as_attr()),
                ],
            )?;
            doc.tree.set_attributes(
                panel,
                [
                    ("id", panel_id),
                    (attr::ARIA_LABELLEDBY, tab_id),
                    (attr::TABINDEX, TabIndex::IN_ORDER.as_attr()),
                    (attr::DATA_STATE, DataState::open(open).as_str().to_string()),
                ],
            )?;
            doc.tree.toggle_attribute(panel, attr::HIDDEN, Some(!open))?;
        }

        let count = items.len();
        let state = Rc::new(RefCell::new(TabsState {
            tablist,
            items,
            values,
            axis: options.orientation.into(),
            nav: NavMachine::new(count, true).with_selected(Some(selected)),
            on_change: options.on_change,
        }));

        let subs = Wiring::new(doc, &state)
            .on(tablist, EventType::FocusIn, TabsState::on_focus_in)
            .on(tablist, EventType::Click, TabsState::on_click)
            .on(EventTarget::Window, EventType::PointerUp, TabsState::on_pointer_up)
            .on(EventTarget::Window, EventType::KeyDown, TabsState::on_key_down)
            .on(EventTarget::Window, EventType::KeyUp, TabsState::on_key_up)
            .finish();

        debug!(%node, count, selected, "tabs attached");
        Ok(Self { state, subs })
    }

    /// Index of the selected tab
    pub fn selected_index(&self) -> usize {
        self.state.borrow().nav.selected().unwrap_or(0)
    }

    /// Value of the selected tab
    pub fn value(&self) -> String {
        let state = self.state.borrow();
        let index = state.nav.selected().unwrap_or(0);
        state.values.get(index).cloned().unwrap_or_default()
    }

    pub fn is_armed(&self) -> bool {
        self.state.borrow().nav.is_armed()
    }

    /// Select the tab with `value`; unknown values are ignored
    pub fn set_value(&self, doc: &mut Document, value: &str) -> WidgetResult<()> {
        let index = self.state.borrow().values.iter().position(|v| v == value);
        match index {
            Some(index) => self.select(doc, index),
            None => {
                trace!(value, "no tab with value");
                Ok(())
            }
        }
    }

    /// Select the tab at `index` without moving focus; out of range is ignored
    pub fn select(&self, doc: &mut Document, index: usize) -> WidgetResult<()> {
        let (items, transition) = {
            let mut s = self.state.borrow_mut();
            if index >= s.items.len() {
                return Ok(());
            }
            (s.items.clone(), s.nav.select(Some(index)))
        };
        match transition {
            Some(transition) => {
                let options = ApplyOptions { focus: false, ..APPLY };
                TabsState::commit(&self.state, doc, &items, transition, options)
            }
            None => Ok(()),
        }
    }
}

impl Behavior for Tabs {
    const NAME: &'static str = "tabs";

    fn destroy(&mut self) {
        if !self.subs.is_empty() {
            debug!(tablist = %self.state.borrow().tablist, "tabs destroyed");
        }
        self.subs.clear();
    }

    fn is_attached(&self) -> bool {
        !self.subs.is_empty()
    }
}

impl TabsState {
    /// Apply a selection and report it when it changed
    fn commit(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        items: &[NavItem],
        transition: Transition,
        options: ApplyOptions,
    ) -> WidgetResult<()> {
        apply_selection(doc, items, transition, options)?;
        if transition.previous == transition.selected {
            return Ok(());
        }

        let (value, on_change) = {
            let s = state.borrow();
            let value = transition.selected.and_then(|i| s.values.get(i).cloned());
            (value, s.on_change.clone())
        };
        if let Some(value) = value {
            debug!(%value, "tab selected");
            emit(on_change, value);
        }
        Ok(())
    }

    fn on_focus_in(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        let (items, transition) = {
            let mut s = state.borrow_mut();
            if s.nav.is_armed() {
                return Ok(());
            }
            (s.items.clone(), s.nav.arm(None))
        };
        match transition {
            Some(transition) => Self::commit(state, doc, &items, transition, APPLY),
            None => Ok(()),
        }
    }

    fn on_click(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        let Some(target) = event.target_node() else {
            return Ok(());
        };
        let (items, transition) = {
            let mut s = state.borrow_mut();
            let Some(index) = element_index(&doc.tree, s.tablist, target) else {
                trace!(%target, "click on tablist outside any tab");
                return Ok(());
            };
            (s.items.clone(), s.nav.pick(index))
        };
        match transition {
            Some(transition) => Self::commit(state, doc, &items, transition, APPLY),
            None => Ok(()),
        }
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
        let tablist = {
            let mut s = state.borrow_mut();
            if !s.nav.is_armed() {
                return Ok(());
            }
            s.nav.disarm();
            s.tablist
        };
        suspend_tab_stop(doc, tablist)?;
        Ok(())
    }

    fn on_key_up(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        let (items, transition) = {
            let mut s = state.borrow_mut();
            let Some(intent) = event.key.as_ref().and_then(|key| s.axis.intent(key)) else {
                return Ok(());
            };
            (s.items.clone(), s.nav.intent(intent))
        };
        match transition {
            Some(transition) => Self::commit(state, doc, &items, transition, APPLY),
            None => Ok(()),
        }
    }
}
