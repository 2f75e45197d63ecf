//! Switch
//!
//! A `[role="switch"]` button inside a label. The click default is
//! prevented so the label does not re-dispatch it.

use std::cell::RefCell;
use std::rc::Rc;

use akit_a11y::aria::attr;
use akit_a11y::AriaRole;
use akit_dom::{Document, Event, EventType, NodeId, Subscriptions};
use serde::Deserialize;
use tracing::debug;

use crate::behavior::{Behavior, Wiring};
use crate::callback::{emit, Callback};
use crate::error::require;
use crate::WidgetResult;

/// Switch options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwitchOptions {
    pub checked: bool,
    #[serde(skip)]
    pub on_change: Option<Callback<bool>>,
}

impl SwitchOptions {
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn on_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_change = Some(Callback::new(f));
        self
    }
}

struct SwitchState {
    button: NodeId,
    checked: bool,
    on_change: Option<Callback<bool>>,
}

/// Attached switch
pub struct Switch {
    state: Rc<RefCell<SwitchState>>,
    subs: Subscriptions,
}

impl Switch {
    pub fn attach(doc: &mut Document, node: NodeId, options: SwitchOptions) -> WidgetResult<Self> {
        let button = require(&doc.tree, node, &AriaRole::Switch.selector(), Self::NAME)?;
        doc.tree
            .set_attribute(button, attr::ARIA_CHECKED, &options.checked.to_string())?;

        let state = Rc::new(RefCell::new(SwitchState {
            button,
            checked: options.checked,
            on_change: options.on_change,
        }));
        let subs = Wiring::new(doc, &state)
            .on(button, EventType::Click, SwitchState::on_click)
            .finish();

        debug!(%node, checked = options.checked, "switch attached");
        Ok(Self { state, subs })
    }

    pub fn is_checked(&self) -> bool {
        self.state.borrow().checked
    }

    /// Set the checked state from outside; not reported
    pub fn set_checked(&self, doc: &mut Document, checked: bool) -> WidgetResult<()> {
        let mut s = self.state.borrow_mut();
        s.checked = checked;
        doc.tree.set_attribute(s.button, attr::ARIA_CHECKED, &checked.to_string())?;
        Ok(())
    }
}

impl Behavior for Switch {
    const NAME: &'static str = "switch";

    fn destroy(&mut self) {
        self.subs.clear();
    }

    fn is_attached(&self) -> bool {
        !self.subs.is_empty()
    }
}

impl SwitchState {
    fn on_click(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        event.prevent_default();
        let (checked, on_change) = {
            let mut s = state.borrow_mut();
            s.checked = doc.tree.get_attribute(s.button, attr::ARIA_CHECKED) != Some("true");
            doc.tree.set_attribute(s.button, attr::ARIA_CHECKED, &s.checked.to_string())?;
            (s.checked, s.on_change.clone())
        };
        emit(on_change, checked);
        Ok(())
    }
}
