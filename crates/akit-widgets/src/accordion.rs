//! Accordion
//!
//! Stacked disclosures; at most one item is open. Items are the
//! container's element children, each holding a title (with a trigger
//! button) and a `[role="region"]` content panel.

use std::cell::RefCell;
use std::rc::Rc;

use akit_a11y::aria::attr;
use akit_a11y::{AriaRole, Axis, TabIndex};
use akit_dom::{Document, Event, EventTarget, EventType, Key, NodeId, Selector, Subscriptions};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::behavior::{Behavior, Wiring};
use crate::callback::{emit, Callback};
use crate::nav::{
    apply_selection, set_disclosure, ApplyOptions, Marker, MarkerTarget, NavItem, NavMachine,
};
use crate::{WidgetError, WidgetResult};

/// Accordion options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccordionOptions {
    #[serde(skip)]
    pub on_change: Option<Callback<Option<usize>>>,
}

impl AccordionOptions {
    /// Called with the open item (or `None`) after every toggle
    pub fn on_change(mut self, f: impl Fn(Option<usize>) + 'static) -> Self {
        self.on_change = Some(Callback::new(f));
        self
    }
}

const ROVING: ApplyOptions = ApplyOptions {
    marker: Marker::None,
    marker_on: MarkerTarget::Item,
    roving: true,
    exclusive_panels: false,
    focus: true,
};

struct AccordionState {
    root: NodeId,
    items: Vec<NavItem>,
    nav: NavMachine,
    open: Option<usize>,
    on_change: Option<Callback<Option<usize>>>,
}

/// Attached accordion
pub struct Accordion {
    state: Rc<RefCell<AccordionState>>,
    subs: Subscriptions,
}

impl Accordion {
    pub fn attach(
        doc: &mut Document,
        node: NodeId,
        options: AccordionOptions,
    ) -> WidgetResult<Self> {
        let region_selector = AriaRole::Region.selector();
        let region = Selector::parse(&region_selector)?;
        let not_region = Selector::parse(&format!(":not({region_selector})"))?;
        let button = Selector::parse("button")?;

        let children = doc.tree.element_children(node);
        if children.is_empty() {
            return Err(WidgetError::Empty {
                widget: Self::NAME,
                what: "items",
            });
        }

        let mut items = Vec::with_capacity(children.len());
        for (index, item) in children.into_iter().enumerate() {
            let content = doc
                .tree
                .query_first(item, &region)
                .ok_or_else(|| WidgetError::missing(Self::NAME, region_selector.as_str()))?;
            let title = doc
                .tree
                .query_first(item, &not_region)
                .ok_or_else(|| WidgetError::missing(Self::NAME, "title"))?;
            let trigger = if doc.tree.matches_selector(title, &button) {
                Some(title)
            } else {
                doc.tree.query_first(title, &button)
            }
            .ok_or_else(|| WidgetError::missing(Self::NAME, "button"))?;

            let trigger_id = doc.generate_id("accordion-trigger");
            let content_id = doc.generate_id("accordion-content");
            let tree = &mut doc.tree;
            tree.set_attributes(
                trigger,
                [
                    ("id", trigger_id.as_str()),
                    (attr::ARIA_CONTROLS, content_id.as_str()),
                    (attr::TABINDEX, TabIndex::roving(index == 0).as_attr().as_str()),
                ],
            )?;
            tree.set_attributes(
                content,
                [("id", content_id.as_str()), (attr::ARIA_LABELLEDBY, trigger_id.as_str())],
            )?;
            set_disclosure(tree, item, content, Some(trigger), index == 0)?;

            items.push(NavItem::new(item, trigger).with_panel(content));
        }

        let count = items.len();
        let triggers: Vec<NodeId> = items.iter().map(|i| i.part).collect();
        let state = Rc::new(RefCell::new(AccordionState {
            root: node,
            items,
            nav: NavMachine::new(count, true).with_selected(Some(0)),
            open: Some(0),
            on_change: options.on_change,
        }));

        let mut wiring = Wiring::new(doc, &state)
            .on(node, EventType::FocusIn, AccordionState::on_focus_in)
            .on(EventTarget::Window, EventType::PointerUp, AccordionState::on_pointer_up)
            .on(EventTarget::Window, EventType::KeyDown, AccordionState::on_key_down)
            .on(EventTarget::Window, EventType::KeyUp, AccordionState::on_key_up);
        for trigger in triggers {
            wiring = wiring.on(trigger, EventType::Click, AccordionState::on_trigger_click);
        }
        let subs = wiring.finish();

        debug!(%node, count, "accordion attached");
        Ok(Self { state, subs })
    }

    /// Index of the open item
    pub fn open_item(&self) -> Option<usize> {
        self.state.borrow().open
    }

    /// Index of the item holding the roving tab stop
    pub fn selected(&self) -> Option<usize> {
        self.state.borrow().nav.selected()
    }

    pub fn is_armed(&self) -> bool {
        self.state.borrow().nav.is_armed()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Open `index` (closing the others) or close everything with `None`
    pub fn set_open(&self, doc: &mut Document, index: Option<usize>) -> WidgetResult<()> {
        AccordionState::open(&self.state, doc, index)
    }
}

impl Behavior for Accordion {
    const NAME: &'static str = "accordion";

    fn destroy(&mut self) {
        if !self.subs.is_empty() {
            debug!(root = %self.state.borrow().root, "accordion destroyed");
        }
        self.subs.clear();
    }

    fn is_attached(&self) -> bool {
        !self.subs.is_empty()
    }
}

impl AccordionState {
    fn open(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        index: Option<usize>,
    ) -> WidgetResult<()> {
        let (items, on_change, open) = {
            let mut s = state.borrow_mut();
            let open = index.filter(|&i| i < s.items.len());
            if open == s.open {
                return Ok(());
            }
            s.open = open;
            (s.items.clone(), s.on_change.clone(), open)
        };

        for (i, item) in items.iter().enumerate() {
            if let Some(panel) = item.panel {
                set_disclosure(&mut doc.tree, item.node, panel, Some(item.part), Some(i) == open)?;
            }
        }
        debug!(?open, "accordion toggled");
        emit(on_change, open);
        Ok(())
    }

    fn on_trigger_click(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        let Some(trigger) = event.current_target.node() else {
            return Ok(());
        };
        let (items, index, transition, target) = {
            let mut s = state.borrow_mut();
            let Some(index) = s.items.iter().position(|i| i.part == trigger) else {
                trace!(%trigger, "click outside accordion triggers");
                return Ok(());
            };
            let target = if s.open == Some(index) { None } else { Some(index) };
            let transition = s.nav.select(Some(index));
            (s.items.clone(), index, transition, target)
        };

        if let Some(transition) = transition {
            apply_selection(doc, &items, transition, ApplyOptions { focus: false, ..ROVING })?;
        }
        trace!(index, "accordion trigger clicked");
        Self::open(state, doc, target)
    }

    fn on_focus_in(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        let (items, transition) = {
            let mut s = state.borrow_mut();
            let index = event
                .target_node()
                .and_then(|target| s.items.iter().position(|i| i.part == target));
            (s.items.clone(), s.nav.arm(index))
        };
        if let Some(transition) = transition {
            apply_selection(doc, &items, transition, ApplyOptions { focus: false, ..ROVING })?;
        }
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
        let Some(intent) = event.key.as_ref().and_then(|key| Axis::Vertical.intent(key)) else {
            return Ok(());
        };
        let (items, transition) = {
            let mut s = state.borrow_mut();
            (s.items.clone(), s.nav.intent(intent))
        };
        if let Some(transition) = transition {
            apply_selection(doc, &items, transition, ROVING)?;
        }
        Ok(())
    }
}
