//! Dialog and alert dialog
//!
//! A `[aria-haspopup="dialog"]` button opening a modal `dialog` element.
//! Both close on Escape; only the plain dialog also closes when the
//! backdrop (the dialog element itself) is clicked.

use std::cell::RefCell;
use std::rc::Rc;

use akit_a11y::aria::attr;
use akit_dom::{Document, Event, EventTarget, EventType, Key, NodeId, Subscriptions};
use serde::Deserialize;
use tracing::debug;

use crate::behavior::{Behavior, Wiring};
use crate::callback::{emit, Callback};
use crate::error::require;
use crate::WidgetResult;

const BUTTON: &str = r#"[aria-haspopup="dialog"]"#;
const DATA_TITLE: &str = "data-title";
const DATA_DESCRIPTION: &str = "data-description";

/// Options shared by [`Dialog`] and [`AlertDialog`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DialogOptions {
    #[serde(skip)]
    pub on_change: Option<Callback<bool>>,
}

impl DialogOptions {
    /// Called with `true` when the dialog opens and `false` when it closes
    pub fn on_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_change = Some(Callback::new(f));
        self
    }
}

struct DialogState {
    button: NodeId,
    dialog: NodeId,
    open: bool,
    on_change: Option<Callback<bool>>,
}

impl DialogState {
    /// Wire ids and labels, then register the listeners
    fn attach(
        doc: &mut Document,
        node: NodeId,
        options: DialogOptions,
        widget: &'static str,
        backdrop_dismiss: bool,
    ) -> WidgetResult<(Rc<RefCell<Self>>, Subscriptions)> {
        let button = require(&doc.tree, node, BUTTON, widget)?;
        let dialog = require(&doc.tree, node, "dialog", widget)?;

        let dialog_id = doc.generate_id("dialog");
        doc.tree.set_attribute(button, attr::DATA_CONTROLS, &dialog_id)?;
        doc.tree.set_attribute(dialog, attr::ID, &dialog_id)?;
        Self::label(doc, dialog, DATA_TITLE, attr::ARIA_LABELLEDBY, "dialog-title")?;
        Self::label(doc, dialog, DATA_DESCRIPTION, attr::ARIA_DESCRIBEDBY, "dialog-description")?;

        let open = doc.tree.has_attribute(dialog, attr::OPEN);
        doc.tree.set_attribute(button, attr::ARIA_EXPANDED, &open.to_string())?;

        let state = Rc::new(RefCell::new(Self {
            button,
            dialog,
            open,
            on_change: options.on_change,
        }));

        let mut wiring = Wiring::new(doc, &state)
            .on(button, EventType::Click, Self::on_button_click)
            .on(dialog, EventType::Close, Self::on_close)
            .on(EventTarget::Window, EventType::KeyDown, Self::on_key_down);
        if backdrop_dismiss {
            wiring = wiring.on(dialog, EventType::Click, Self::on_dialog_click);
        }

        let subs = wiring.finish();
        debug!(%node, widget, "dialog attached");
        Ok((state, subs))
    }

    /// Give the `marker` child an id, point `relation` at it and drop the marker
    fn label(
        doc: &mut Document,
        dialog: NodeId,
        marker: &str,
        relation: &str,
        prefix: &str,
    ) -> WidgetResult<()> {
        let Some(part) = doc.tree.query_selector(dialog, &format!("[{marker}]"))? else {
            return Ok(());
        };
        let id = doc.generate_id(prefix);
        doc.tree.set_attribute(part, attr::ID, &id)?;
        doc.tree.remove_attribute(part, marker)?;
        doc.tree.set_attribute(dialog, relation, &id)?;
        Ok(())
    }

    /// Show the dialog; returns the node that should receive focus
    fn show(state: &Rc<RefCell<Self>>, doc: &mut Document) -> WidgetResult<Option<NodeId>> {
        let (dialog, on_change) = {
            let mut s = state.borrow_mut();
            if s.open {
                return Ok(None);
            }
            s.open = true;
            doc.tree.set_attribute(s.dialog, attr::OPEN, "")?;
            doc.tree.set_attribute(s.button, attr::ARIA_EXPANDED, "true")?;
            (s.dialog, s.on_change.clone())
        };
        debug!(%dialog, "dialog opened");
        emit(on_change, true);

        let first = doc
            .tree
            .descendants(dialog)
            .into_iter()
            .find(|&n| n != dialog && doc.is_focusable(n));
        Ok(Some(first.unwrap_or(dialog)))
    }

    /// Remove `open`; returns the dialog when it was open
    fn hide(state: &Rc<RefCell<Self>>, doc: &mut Document) -> WidgetResult<Option<NodeId>> {
        let s = state.borrow();
        if !s.open {
            return Ok(None);
        }
        doc.tree.remove_attribute(s.dialog, attr::OPEN)?;
        Ok(Some(s.dialog))
    }

    fn on_button_click(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        if let Some(target) = Self::show(state, doc)? {
            doc.defer_focus(target);
        }
        Ok(())
    }

    fn on_dialog_click(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        if event.target_node() != Some(state.borrow().dialog) {
            return Ok(());
        }
        if let Some(dialog) = Self::hide(state, doc)? {
            doc.dispatch(Event::new(EventType::Close, dialog));
        }
        Ok(())
    }

    fn on_key_down(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        if !event.is_key(&Key::Escape) {
            return Ok(());
        }
        if let Some(dialog) = Self::hide(state, doc)? {
            doc.dispatch(Event::new(EventType::Close, dialog));
        }
        Ok(())
    }

    /// The `close` event: restore the button and hand focus back to it
    fn on_close(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        let (button, on_change) = {
            let mut s = state.borrow_mut();
            s.open = false;
            doc.tree.set_attribute(s.button, attr::ARIA_EXPANDED, "false")?;
            (s.button, s.on_change.clone())
        };
        debug!(%button, "dialog closed");
        doc.defer_focus(button);
        emit(on_change, false);
        Ok(())
    }
}

macro_rules! dialog_widget {
    ($(#[$meta:meta])* $name:ident, $label:literal, backdrop = $backdrop:literal) => {
        $(#[$meta])*
        pub struct $name {
            state: Rc<RefCell<DialogState>>,
            subs: Subscriptions,
        }

        impl $name {
            pub fn attach(
                doc: &mut Document,
                node: NodeId,
                options: DialogOptions,
            ) -> WidgetResult<Self> {
                let (state, subs) = DialogState::attach(doc, node, options, Self::NAME, $backdrop)?;
                Ok(Self { state, subs })
            }

            pub fn is_open(&self) -> bool {
                self.state.borrow().open
            }

            /// Open from host code and move focus into the dialog
            pub fn open(&self, doc: &mut Document) -> WidgetResult<()> {
                if let Some(target) = DialogState::show(&self.state, doc)? {
                    doc.focus(target);
                }
                Ok(())
            }

            /// Close from host code; fires the dialog's `close` event
            pub fn close(&self, doc: &mut Document) -> WidgetResult<()> {
                if let Some(dialog) = DialogState::hide(&self.state, doc)? {
                    doc.dispatch_event(Event::new(EventType::Close, dialog));
                }
                Ok(())
            }
        }

        impl Behavior for $name {
            const NAME: &'static str = $label;

            fn destroy(&mut self) {
                self.subs.clear();
            }

            fn is_attached(&self) -> bool {
                !self.subs.is_empty()
            }
        }
    };
}

dialog_widget!(
    /// Attached modal dialog; a backdrop click closes it
    Dialog,
    "dialog",
    backdrop = true
);

dialog_widget!(
    /// Attached alert dialog; only Escape or an explicit close dismisses it
    AlertDialog,
    "alert dialog",
    backdrop = false
);

#[cfg(test)]
mod tests {
    use super::*;

    const MARKUP: &str = r#"
        <div>
          <button aria-haspopup="dialog">Delete</button>
          <dialog>
            <div class="panel">
              <h2 data-title>Delete file?</h2>
              <p data-description>This cannot be undone.</p>
              <button class="cancel">Cancel</button>
            </div>
          </dialog>
        </div>"#;

    struct Fixture {
        doc: Document,
        button: NodeId,
        dialog: NodeId,
        panel: NodeId,
        cancel: NodeId,
    }

    fn fixture() -> (Fixture, NodeId) {
        let (doc, root) = akit_html::parse_fragment(MARKUP).unwrap();
        let q = |s: &str| doc.tree.query_selector(root, s).unwrap().unwrap();
        let (button, dialog, panel, cancel) = (q("button"), q("dialog"), q(".panel"), q(".cancel"));
        (
            Fixture {
                doc,
                button,
                dialog,
                panel,
                cancel,
            },
            root,
        )
    }

    #[test]
    fn test_setup_labels() {
        let (mut f, root) = fixture();
        let _dialog = Dialog::attach(&mut f.doc, root, DialogOptions::default()).unwrap();
        let title = f.doc.tree.query_selector(root, "h2").unwrap().unwrap();
        let description = f.doc.tree.query_selector(root, "p").unwrap().unwrap();
        let id = f.doc.tree.get_attribute(f.dialog, "id").unwrap();

        assert_eq!(f.doc.tree.get_attribute(f.button, "data-controls"), Some(id));
        assert_eq!(
            f.doc.tree.get_attribute(f.dialog, "aria-labelledby"),
            f.doc.tree.get_attribute(title, "id")
        );
        assert_eq!(
            f.doc.tree.get_attribute(f.dialog, "aria-describedby"),
            f.doc.tree.get_attribute(description, "id")
        );
        assert!(!f.doc.tree.has_attribute(title, "data-title"));
        assert!(!f.doc.tree.has_attribute(description, "data-description"));
    }

    #[test]
    fn test_open_and_escape() {
        let (mut f, root) = fixture();
        let dialog = Dialog::attach(&mut f.doc, root, DialogOptions::default()).unwrap();

        f.doc.click(f.button);
        assert!(dialog.is_open());
        assert!(f.doc.tree.has_attribute(f.dialog, "open"));
        assert_eq!(f.doc.tree.get_attribute(f.button, "aria-expanded"), Some("true"));
        assert_eq!(f.doc.active_element(), Some(f.cancel));

        f.doc.press(Key::Escape);
        assert!(!dialog.is_open());
        assert!(!f.doc.tree.has_attribute(f.dialog, "open"));
        assert_eq!(f.doc.tree.get_attribute(f.button, "aria-expanded"), Some("false"));
        assert_eq!(f.doc.active_element(), Some(f.button));
    }

    #[test]
    fn test_backdrop_click_closes_dialog_only() {
        let (mut f, root) = fixture();
        let dialog = Dialog::attach(&mut f.doc, root, DialogOptions::default()).unwrap();

        f.doc.click(f.button);
        f.doc.click(f.panel);
        assert!(dialog.is_open());
        f.doc.click(f.dialog);
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_alert_dialog_ignores_backdrop() {
        let (mut f, root) = fixture();
        let alert = AlertDialog::attach(&mut f.doc, root, DialogOptions::default()).unwrap();

        f.doc.click(f.button);
        f.doc.click(f.dialog);
        assert!(alert.is_open());
        alert.close(&mut f.doc).unwrap();
        assert!(!alert.is_open());
        assert_eq!(f.doc.active_element(), Some(f.button));
    }

    #[test]
    fn test_on_change_reports_open_state() {
        let (mut f, root) = fixture();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let dialog = Dialog::attach(
            &mut f.doc,
            root,
            DialogOptions::default().on_change(move |v| sink.borrow_mut().push(v)),
        )
        .unwrap();

        dialog.open(&mut f.doc).unwrap();
        dialog.open(&mut f.doc).unwrap();
        dialog.close(&mut f.doc).unwrap();
        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn test_attach_keeps_listeners_until_destroy() {
        let (mut f, root) = fixture();
        let mut dialog = Dialog::attach(&mut f.doc, root, DialogOptions::default()).unwrap();
        assert!(dialog.is_attached());

        dialog.destroy();
        assert!(!dialog.is_attached());
        f.doc.click(f.button);
        assert!(!dialog.is_open());
    }
}
