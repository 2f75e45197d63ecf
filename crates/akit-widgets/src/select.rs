//! Select
//!
//! A `[role="combobox"]` trigger opening a `[role="listbox"]` of
//! `[role="option"]` entries, optionally grouped by `[role="group"]`.

use std::cell::RefCell;
use std::rc::Rc;

use akit_a11y::aria::attr;
use akit_a11y::{AriaRole, DataState, NavIntent, TabIndex};
use akit_dom::{Document, Event, EventTarget, EventType, Key, NodeId, Selector, Subscriptions};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::behavior::{Behavior, Wiring};
use crate::callback::{emit, Callback};
use crate::error::require;
use crate::nav::{
    apply_selection, item_index, set_disclosure, ApplyOptions, Marker, MarkerTarget, NavItem,
    NavMachine, Transition,
};
use crate::{WidgetError, WidgetResult};

/// Select options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectOptions {
    /// Value committed on attach
    pub value: Option<String>,
    #[serde(skip)]
    pub on_change: Option<Callback<String>>,
}

impl SelectOptions {
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Called with the value of a newly committed option
    pub fn on_change(mut self, f: impl Fn(String) + 'static) -> Self {
        self.on_change = Some(Callback::new(f));
        self
    }
}

const HIGHLIGHT: ApplyOptions = ApplyOptions {
    marker: Marker::Flag(attr::DATA_HIGHLIGHTED),
    marker_on: MarkerTarget::Item,
    roving: false,
    exclusive_panels: false,
    focus: false,
};

struct SelectState {
    trigger: NodeId,
    list: NodeId,
    options: Vec<NavItem>,
    values: Vec<String>,
    /// Armed while the list is open; the selection is the highlight
    nav: NavMachine,
    committed: Option<usize>,
    on_change: Option<Callback<String>>,
}

/// Attached select
pub struct Select {
    state: Rc<RefCell<SelectState>>,
    subs: Subscriptions,
}

impl Select {
    pub fn attach(doc: &mut Document, node: NodeId, options: SelectOptions) -> WidgetResult<Self> {
        let trigger = require(&doc.tree, node, &AriaRole::Combobox.selector(), Self::NAME)?;
        let list = require(&doc.tree, node, &AriaRole::Listbox.selector(), Self::NAME)?;
        let option_selector = AriaRole::Option.selector();
        let not_option = Selector::parse(&format!(":not({option_selector})"))?;
        let nodes = doc.tree.query_selector_all(list, &option_selector)?;
        if nodes.is_empty() {
            return Err(WidgetError::Empty {
                widget: Self::NAME,
                what: "options",
            });
        }

        let list_id = doc.generate_id("select-list");
        doc.tree.set_attributes(
            trigger,
            [
                (attr::ARIA_CONTROLS, list_id.as_str()),
                (attr::ARIA_EXPANDED, "false"),
                ("aria-autocomplete", "none"),
            ],
        )?;
        doc.tree.set_attributes(
            list,
            [
                ("id", list_id),
                (attr::TABINDEX, TabIndex::NotFocusable.as_attr()),
            ],
        )?;
        set_disclosure(&mut doc.tree, list, list, None, false)?;

        for group in doc.tree.query_selector_all(node, &AriaRole::Group.selector())? {
            let Some(label) = doc.tree.query_first(group, &not_option) else {
                trace!(%group, "group without label");
                continue;
            };
            let label_id = doc.generate_id("select-group-label");
            doc.tree.set_attribute(label, "id", &label_id)?;
            doc.tree.set_attribute(group, attr::ARIA_LABELLEDBY, &label_id)?;
        }

        let mut values = Vec::with_capacity(nodes.len());
        for &option in &nodes {
            doc.tree.set_attributes(
                option,
                [
                    (attr::ARIA_SELECTED, "false"),
                    (attr::DATA_STATE, DataState::checked(false).as_str()),
                    (attr::TABINDEX, "-1"),
                ],
            )?;
            let value = match doc.tree.get_attribute(option, attr::DATA_VALUE) {
                Some(value) => value.to_string(),
                None => doc.tree.text_content(option).trim().to_string(),
            };
            values.push(value);
        }

        let committed = options
            .value
            .as_deref()
            .and_then(|v| values.iter().position(|value| value == v));
        let count = nodes.len();
        let state = Rc::new(RefCell::new(SelectState {
            trigger,
            list,
            options: nodes.into_iter().map(|n| NavItem::new(n, n)).collect(),
            values,
            nav: NavMachine::new(count, true),
            committed: None,
            on_change: options.on_change,
        }));
        if let Some(index) = committed {
            SelectState::write_committed(&state.borrow(), doc, index)?;
            state.borrow_mut().committed = Some(index);
        }

        let subs = Wiring::new(doc, &state)
            .on(trigger, EventType::Click, SelectState::on_trigger_click)
            .on(trigger, EventType::KeyUp, SelectState::on_trigger_key_up)
            .on(list, EventType::PointerMove, SelectState::on_list_move)
            .on(list, EventType::PointerLeave, SelectState::on_list_leave)
            .on(EventTarget::Window, EventType::PointerUp, SelectState::on_pointer_up)
            .on(EventTarget::Window, EventType::KeyDown, SelectState::on_key_down)
            .on(EventTarget::Window, EventType::KeyUp, SelectState::on_key_up)
            .finish();

        debug!(%node, count, "select attached");
        Ok(Self { state, subs })
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().nav.is_armed()
    }

    /// Index of the highlighted option while open
    pub fn highlighted(&self) -> Option<usize> {
        self.state.borrow().nav.selected()
    }

    /// Index of the committed option
    pub fn selected_index(&self) -> Option<usize> {
        self.state.borrow().committed
    }

    /// Value of the committed option
    pub fn value(&self) -> Option<String> {
        let s = self.state.borrow();
        s.committed.and_then(|i| s.values.get(i).cloned())
    }

    pub fn open(&self, doc: &mut Document) -> WidgetResult<()> {
        SelectState::open(&self.state, doc)
    }

    pub fn close(&self, doc: &mut Document) -> WidgetResult<()> {
        SelectState::close(&self.state, doc)
    }

    /// Commit the option with `value`; unknown values are ignored
    pub fn set_value(&self, doc: &mut Document, value: &str) -> WidgetResult<()> {
        let index = self.state.borrow().values.iter().position(|v| v == value);
        match index {
            Some(index) => SelectState::commit(&self.state, doc, index),
            None => Ok(()),
        }
    }
}

impl Behavior for Select {
    const NAME: &'static str = "select";

    fn destroy(&mut self) {
        if !self.subs.is_empty() {
            debug!(trigger = %self.state.borrow().trigger, "select destroyed");
        }
        self.subs.clear();
    }

    fn is_attached(&self) -> bool {
        !self.subs.is_empty()
    }
}

impl SelectState {
    fn highlight(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        transition: Option<Transition>,
    ) -> WidgetResult<()> {
        let Some(transition) = transition else {
            return Ok(());
        };
        let options = state.borrow().options.clone();
        apply_selection(doc, &options, transition, HIGHLIGHT)
    }

    fn open(state: &Rc<RefCell<Self>>, doc: &mut Document) -> WidgetResult<()> {
        let transition = {
            let mut s = state.borrow_mut();
            if s.nav.is_armed() {
                return Ok(());
            }
            set_disclosure(&mut doc.tree, s.list, s.list, Some(s.trigger), true)?;
            let start = s.committed.unwrap_or(0);
            s.nav.arm(Some(start))
        };
        debug!("select opened");
        Self::highlight(state, doc, transition)
    }

    fn close(state: &Rc<RefCell<Self>>, doc: &mut Document) -> WidgetResult<()> {
        let transition = {
            let mut s = state.borrow_mut();
            if !s.nav.is_armed() {
                return Ok(());
            }
            set_disclosure(&mut doc.tree, s.list, s.list, Some(s.trigger), false)?;
            s.nav.dismiss()
        };
        debug!("select closed");
        Self::highlight(state, doc, transition)
    }

    fn write_committed(&self, doc: &mut Document, index: usize) -> WidgetResult<()> {
        for (i, option) in self.options.iter().enumerate() {
            let checked = i == index;
            doc.tree.set_attributes(
                option.node,
                [
                    (attr::ARIA_SELECTED, checked.to_string()),
                    (attr::DATA_STATE, DataState::checked(checked).as_str().to_string()),
                ],
            )?;
        }
        Ok(())
    }

    fn commit(state: &Rc<RefCell<Self>>, doc: &mut Document, index: usize) -> WidgetResult<()> {
        let (value, on_change) = {
            let mut s = state.borrow_mut();
            let Some(value) = s.values.get(index).cloned() else {
                return Ok(());
            };
            if s.committed == Some(index) {
                return Ok(());
            }
            s.write_committed(doc, index)?;
            s.committed = Some(index);
            (value, s.on_change.clone())
        };
        debug!(index, %value, "option committed");
        emit(on_change, value);
        Ok(())
    }

    fn on_trigger_click(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        if state.borrow().nav.is_armed() {
            Self::close(state, doc)
        } else {
            Self::open(state, doc)
        }
    }

    fn on_trigger_key_up(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        if event.is_key(&Key::ArrowDown) && !state.borrow().nav.is_armed() {
            // the opening key must not also move the highlight
            event.stop_propagation();
            Self::open(state, doc)?;
        }
        Ok(())
    }

    fn on_list_move(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        let Some(target) = event.target_node() else {
            return Ok(());
        };
        let transition = {
            let mut s = state.borrow_mut();
            let nodes: Vec<NodeId> = s.options.iter().map(|o| o.node).collect();
            let index = item_index(&doc.tree, &nodes, s.list, target);
            s.nav.select(index)
        };
        Self::highlight(state, doc, transition)
    }

    fn on_list_leave(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        let transition = state.borrow_mut().nav.select(None);
        Self::highlight(state, doc, transition)
    }

    fn on_pointer_up(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        let Some(target) = event.target_node() else {
            return Self::close(state, doc);
        };
        let (option, on_trigger) = {
            let s = state.borrow();
            if !s.nav.is_armed() {
                return Ok(());
            }
            let nodes: Vec<NodeId> = s.options.iter().map(|o| o.node).collect();
            (
                item_index(&doc.tree, &nodes, s.list, target),
                doc.tree.contains(s.trigger, target),
            )
        };

        if let Some(index) = option {
            Self::commit(state, doc, index)?;
            return Self::close(state, doc);
        }
        if !on_trigger {
            Self::close(state, doc)?;
        }
        Ok(())
    }

    fn on_key_down(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        if event.is_key(&Key::Tab) {
            Self::close(state, doc)?;
        }
        Ok(())
    }

    fn on_key_up(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        let Some(key) = event.key.clone() else {
            return Ok(());
        };
        let highlighted = {
            let s = state.borrow();
            if !s.nav.is_armed() {
                return Ok(());
            }
            s.nav.selected()
        };

        match key {
            Key::Escape => Self::close(state, doc),
            Key::Enter | Key::Space => {
                if let Some(index) = highlighted {
                    Self::commit(state, doc, index)?;
                }
                Self::close(state, doc)
            }
            Key::ArrowDown | Key::ArrowUp => {
                let intent = if key == Key::ArrowDown {
                    NavIntent::Forward
                } else {
                    NavIntent::Backward
                };
                let transition = state.borrow_mut().nav.intent(intent);
                Self::highlight(state, doc, transition)
            }
            _ => Ok(()),
        }
    }
}
