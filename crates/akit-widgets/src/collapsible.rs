//! Collapsible
//!
//! A single disclosure: an optional `[data-type="trigger"]` button
//! showing and hiding a required `[data-type="content"]` panel.

use std::cell::RefCell;
use std::rc::Rc;

use akit_a11y::aria::attr;
use akit_a11y::DataState;
use akit_dom::{AttrValue, Document, Event, EventType, NodeId, Subscriptions};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::behavior::{Behavior, Wiring};
use crate::callback::{emit, Callback};
use crate::error::require;
use crate::nav::set_disclosure;
use crate::WidgetResult;

const TRIGGER: &str = r#"[data-type="trigger"]"#;
const CONTENT: &str = r#"[data-type="content"]"#;

/// Collapsible options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollapsibleOptions {
    pub default_open: bool,
    pub open: bool,
    pub disabled: bool,
    #[serde(skip)]
    pub on_change: Option<Callback<bool>>,
}

impl CollapsibleOptions {
    pub fn default_open(mut self, default_open: bool) -> Self {
        self.default_open = default_open;
        self
    }

    pub fn open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Called with the new open state
    pub fn on_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_change = Some(Callback::new(f));
        self
    }
}

struct CollapsibleState {
    trigger: Option<NodeId>,
    content: NodeId,
    open: bool,
    disabled: bool,
    on_change: Option<Callback<bool>>,
}

/// Attached collapsible
pub struct Collapsible {
    state: Rc<RefCell<CollapsibleState>>,
    subs: Subscriptions,
}

impl Collapsible {
    pub fn attach(
        doc: &mut Document,
        node: NodeId,
        options: CollapsibleOptions,
    ) -> WidgetResult<Self> {
        let trigger = doc.tree.query_selector(node, TRIGGER)?;
        let content = require(&doc.tree, node, CONTENT, Self::NAME)?;

        let id = doc.generate_id("collapsible-content");
        doc.tree.set_attribute(content, attr::ID, &id)?;
        if let Some(trigger) = trigger {
            doc.tree.set_attribute(trigger, attr::ARIA_CONTROLS, &id)?;
        }

        let state = CollapsibleState {
            trigger,
            content,
            open: options.open || options.default_open,
            disabled: options.disabled,
            on_change: options.on_change,
        };
        state.write(doc)?;
        let state = Rc::new(RefCell::new(state));

        let subs = match trigger {
            Some(trigger) => Wiring::new(doc, &state)
                .on(trigger, EventType::Click, CollapsibleState::on_trigger_click)
                .finish(),
            None => {
                trace!(%node, "collapsible without trigger");
                Subscriptions::new()
            }
        };

        debug!(%node, open = state.borrow().open, "collapsible attached");
        Ok(Self { state, subs })
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    pub fn is_disabled(&self) -> bool {
        self.state.borrow().disabled
    }

    /// Open or close; reported only when the value changes
    pub fn set_open(&self, doc: &mut Document, open: bool) -> WidgetResult<()> {
        let on_change = {
            let mut s = self.state.borrow_mut();
            if s.open == open {
                return Ok(());
            }
            s.open = open;
            s.write(doc)?;
            s.on_change.clone()
        };
        emit(on_change, open);
        Ok(())
    }

    pub fn set_disabled(&self, doc: &mut Document, disabled: bool) -> WidgetResult<()> {
        let mut s = self.state.borrow_mut();
        s.disabled = disabled;
        s.write(doc)
    }
}

impl Behavior for Collapsible {
    const NAME: &'static str = "collapsible";

    fn destroy(&mut self) {
        self.subs.clear();
    }

    /// A collapsible without a trigger has nothing to listen to and
    /// never counts as attached
    fn is_attached(&self) -> bool {
        !self.subs.is_empty()
    }
}

impl CollapsibleState {
    fn write(&self, doc: &mut Document) -> WidgetResult<()> {
        set_disclosure(&mut doc.tree, self.content, self.content, self.trigger, self.open)?;
        if let Some(trigger) = self.trigger {
            doc.tree.set_attributes(
                trigger,
                [
                    (attr::DATA_STATE, AttrValue::from(DataState::open(self.open).as_str())),
                    (attr::DATA_DISABLED, AttrValue::Bool(self.disabled)),
                ],
            )?;
        }
        Ok(())
    }

    fn on_trigger_click(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        let (open, on_change) = {
            let mut s = state.borrow_mut();
            if s.disabled {
                trace!("collapsible disabled; click ignored");
                return Ok(());
            }
            s.open = !s.open;
            s.write(doc)?;
            (s.open, s.on_change.clone())
        };
        debug!(open, "collapsible toggled");
        emit(on_change, open);
        Ok(())
    }
}
