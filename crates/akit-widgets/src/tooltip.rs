//! Tooltip
//!
//! Visibility only; rendering and placement are up to the host. While the
//! trigger has focus the pointer cannot hide or show the tooltip.

use std::cell::RefCell;
use std::rc::Rc;

use akit_a11y::aria::attr;
use akit_a11y::DataState;
use akit_dom::{Document, Event, EventTarget, EventType, Key, NodeId, Subscriptions};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::behavior::{Behavior, Wiring};
use crate::callback::{emit, Callback};
use crate::WidgetResult;

/// Tooltip options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TooltipOptions {
    #[serde(skip)]
    pub on_change: Option<Callback<bool>>,
}

impl TooltipOptions {
    /// Called with the new visibility
    pub fn on_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_change = Some(Callback::new(f));
        self
    }
}

struct TooltipState {
    node: NodeId,
    focused: bool,
    visible: bool,
    on_change: Option<Callback<bool>>,
}

/// Attached tooltip
pub struct Tooltip {
    state: Rc<RefCell<TooltipState>>,
    subs: Subscriptions,
}

impl Tooltip {
    pub fn attach(doc: &mut Document, node: NodeId, options: TooltipOptions) -> WidgetResult<Self> {
        doc.tree
            .set_attribute(node, attr::DATA_STATE, DataState::open(false).as_str())?;
        let state = Rc::new(RefCell::new(TooltipState {
            node,
            focused: false,
            visible: false,
            on_change: options.on_change,
        }));

        let subs = Wiring::new(doc, &state)
            .on(node, EventType::PointerEnter, TooltipState::on_pointer_enter)
            .on(node, EventType::PointerLeave, TooltipState::on_pointer_leave)
            .on(node, EventType::FocusIn, TooltipState::on_focus_in)
            .on(node, EventType::FocusOut, TooltipState::on_focus_out)
            .on(EventTarget::Window, EventType::KeyUp, TooltipState::on_key_up)
            .finish();

        debug!(%node, "tooltip attached");
        Ok(Self { state, subs })
    }

    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }
}

impl Behavior for Tooltip {
    const NAME: &'static str = "tooltip";

    fn destroy(&mut self) {
        self.subs.clear();
    }

    fn is_attached(&self) -> bool {
        !self.subs.is_empty()
    }
}

impl TooltipState {
    fn set_visible(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        visible: bool,
    ) -> WidgetResult<()> {
        let on_change = {
            let mut s = state.borrow_mut();
            if s.visible == visible {
                return Ok(());
            }
            s.visible = visible;
            doc.tree
                .set_attribute(s.node, attr::DATA_STATE, DataState::open(visible).as_str())?;
            s.on_change.clone()
        };
        trace!(visible, "tooltip visibility");
        emit(on_change, visible);
        Ok(())
    }

    fn on_pointer_enter(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        if state.borrow().focused {
            return Ok(());
        }
        Self::set_visible(state, doc, true)
    }

    fn on_pointer_leave(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        if state.borrow().focused {
            return Ok(());
        }
        Self::set_visible(state, doc, false)
    }

    fn on_focus_in(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        state.borrow_mut().focused = true;
        Self::set_visible(state, doc, true)
    }

    fn on_focus_out(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        state.borrow_mut().focused = false;
        Self::set_visible(state, doc, false)
    }

    fn on_key_up(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        if event.is_key(&Key::Escape) {
            Self::set_visible(state, doc, false)?;
        }
        Ok(())
    }
}
