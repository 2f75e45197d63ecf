//! Slider
//!
//! A `[role="slider"]` thumb over a `[data-type="track"]` with a
//! `[data-type="range"]` fill. Values move by keyboard while the thumb
//! has focus and by dragging anywhere on the root.

use std::cell::RefCell;
use std::rc::Rc;

use akit_a11y::aria::attr;
use akit_a11y::{AriaRole, Axis, NavIntent, Orientation, TabIndex, TextDirection};
use akit_dom::{Document, Event, EventTarget, EventType, Key, NodeId, Subscriptions};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::behavior::{Behavior, Wiring};
use crate::callback::{emit, Callback};
use crate::error::require;
use crate::{WidgetError, WidgetResult};

/// Custom property holding the thumb position
pub const THUMB_OFFSET_PROPERTY: &str = "--akit-thumb-offset";
/// Custom property holding the range fill end
pub const RANGE_OFFSET_PROPERTY: &str = "--akit-range-offset";

/// Steps moved by PageUp/PageDown and by Shift+arrow
const LARGE_STEP: f64 = 10.0;

/// Slider options
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SliderOptions {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub dir: TextDirection,
    pub orientation: Orientation,
    #[serde(skip)]
    pub on_change: Option<Callback<f64>>,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self {
            value: 0.0,
            min: 0.0,
            max: 100.0,
            step: 1.0,
            dir: TextDirection::Ltr,
            orientation: Orientation::Horizontal,
            on_change: None,
        }
    }
}

impl SliderOptions {
    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn dir(mut self, dir: TextDirection) -> Self {
        self.dir = dir;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Called with every new value
    pub fn on_change(mut self, f: impl Fn(f64) + 'static) -> Self {
        self.on_change = Some(Callback::new(f));
        self
    }
}

struct SliderState {
    root: NodeId,
    thumb: NodeId,
    value: f64,
    min: f64,
    max: f64,
    step: f64,
    /// Decimal places of `step`, used to drop float noise
    precision: i32,
    dir: TextDirection,
    orientation: Orientation,
    dragging: bool,
    keyboard: bool,
    on_change: Option<Callback<f64>>,
}

/// Attached slider
pub struct Slider {
    state: Rc<RefCell<SliderState>>,
    subs: Subscriptions,
}

fn decimals(step: f64) -> i32 {
    let text = step.to_string();
    text.split_once('.').map_or(0, |(_, fraction)| fraction.len() as i32)
}

impl Slider {
    pub fn attach(doc: &mut Document, node: NodeId, options: SliderOptions) -> WidgetResult<Self> {
        for (option, value) in [
            ("value", options.value),
            ("min", options.min),
            ("max", options.max),
            ("step", options.step),
        ] {
            if !value.is_finite() {
                return Err(WidgetError::NotFinite {
                    widget: Self::NAME,
                    option,
                });
            }
        }
        let thumb = require(&doc.tree, node, &AriaRole::Slider.selector(), Self::NAME)?;
        let track = require(&doc.tree, node, r#"[data-type="track"]"#, Self::NAME)?;
        let range = require(&doc.tree, node, r#"[data-type="range"]"#, Self::NAME)?;

        let orientation = options.orientation.as_str();
        doc.tree.set_attributes(
            thumb,
            [
                (attr::ARIA_ORIENTATION, orientation.to_string()),
                (attr::TABINDEX, TabIndex::IN_ORDER.as_attr()),
            ],
        )?;
        doc.tree.set_attributes(
            node,
            [("dir", options.dir.as_str()), ("data-orientation", orientation)],
        )?;
        doc.tree.set_attribute(track, "data-orientation", orientation)?;
        doc.tree.set_attribute(range, "data-orientation", orientation)?;

        let step = if options.step > 0.0 { options.step } else { 1.0 };
        let state = Rc::new(RefCell::new(SliderState {
            root: node,
            thumb,
            value: options.value.clamp(options.min, options.max.max(options.min)),
            min: options.min,
            max: options.max.max(options.min),
            step,
            precision: decimals(step),
            dir: options.dir,
            orientation: options.orientation,
            dragging: false,
            keyboard: false,
            on_change: options.on_change,
        }));
        state.borrow().write(doc)?;

        let subs = Wiring::new(doc, &state)
            .on(node, EventType::PointerDown, SliderState::on_pointer_down)
            .on(thumb, EventType::Focus, SliderState::on_thumb_focus)
            .on(thumb, EventType::Blur, SliderState::on_thumb_blur)
            .on(EventTarget::Window, EventType::PointerMove, SliderState::on_pointer_move)
            .on(EventTarget::Window, EventType::PointerUp, SliderState::on_pointer_up)
            .on(EventTarget::Window, EventType::KeyDown, SliderState::on_key_down)
            .finish();

        debug!(%node, "slider attached");
        Ok(Self { state, subs })
    }

    pub fn value(&self) -> f64 {
        self.state.borrow().value
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().dragging
    }

    /// Set the value from outside; clamped, not reported
    pub fn set_value(&self, doc: &mut Document, value: f64) -> WidgetResult<()> {
        let mut s = self.state.borrow_mut();
        s.value = s.normalize(value);
        s.write(doc)
    }
}

impl Behavior for Slider {
    const NAME: &'static str = "slider";

    fn destroy(&mut self) {
        if !self.subs.is_empty() {
            debug!(root = %self.state.borrow().root, "slider destroyed");
        }
        self.subs.clear();
    }

    fn is_attached(&self) -> bool {
        !self.subs.is_empty()
    }
}

impl SliderState {
    /// Round to the step precision and clamp; NaN keeps the current value
    fn normalize(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.value;
        }
        let scale = 10f64.powi(self.precision);
        ((value * scale).round() / scale).clamp(self.min, self.max)
    }

    /// ARIA values and offset properties for the current value
    fn write(&self, doc: &mut Document) -> WidgetResult<()> {
        doc.tree.set_attributes(
            self.thumb,
            [
                (attr::ARIA_VALUEMIN, self.min),
                (attr::ARIA_VALUEMAX, self.max),
                (attr::ARIA_VALUENOW, self.value),
            ],
        )?;

        let span = self.max - self.min;
        let fraction = if span > 0.0 { (self.value - self.min) / span } else { 0.0 };
        let size = doc.tree.rect(self.thumb).map_or(0.0, |rect| match self.orientation {
            Orientation::Horizontal => rect.width / 2.0,
            Orientation::Vertical => rect.height / 2.0,
        });
        let offset = size * (fraction * 2.0) - size;
        let percent = fraction * 100.0;

        doc.tree.set_style_property(
            self.root,
            THUMB_OFFSET_PROPERTY,
            &format!("calc({percent}% - {offset}px)"),
        )?;
        doc.tree.set_style_property(
            self.root,
            RANGE_OFFSET_PROPERTY,
            &format!("calc({}% + {offset}px)", 100.0 - percent),
        )?;
        Ok(())
    }

    /// Apply and report a new value
    fn change(state: &Rc<RefCell<Self>>, doc: &mut Document, value: f64) -> WidgetResult<()> {
        let (value, on_change) = {
            let mut s = state.borrow_mut();
            let value = s.normalize(value);
            if value == s.value {
                return Ok(());
            }
            s.value = value;
            s.write(doc)?;
            (value, s.on_change.clone())
        };
        debug!(value, "slider changed");
        emit(on_change, value);
        Ok(())
    }

    /// Value under a pointer at client coordinates, snapped up to a step
    fn value_at(&self, doc: &Document, x: f64, y: f64) -> Option<f64> {
        let bounds = doc.tree.rect(self.root)?;
        let fraction = match self.orientation {
            Orientation::Horizontal => {
                let fraction = bounds.fraction_x(x)?;
                match self.dir {
                    TextDirection::Ltr => fraction,
                    TextDirection::Rtl => 1.0 - fraction,
                }
            }
            Orientation::Vertical => {
                let fraction = 1.0 - bounds.fraction_y(y)?;
                debug!(fraction, "vertical slider position");
                fraction
            }
        };
        let steps = ((self.max - self.min) * fraction / self.step).ceil();
        Some(self.min + steps * self.step)
    }

    fn drag_to(state: &Rc<RefCell<Self>>, doc: &mut Document, event: &Event) -> WidgetResult<()> {
        let value = state.borrow().value_at(doc, event.client_x, event.client_y);
        match value {
            Some(value) => Self::change(state, doc, value),
            None => {
                trace!("slider has no layout box");
                Ok(())
            }
        }
    }

    fn on_pointer_down(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        state.borrow_mut().dragging = true;
        Self::drag_to(state, doc, event)
    }

    fn on_pointer_move(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        if !state.borrow().dragging {
            return Ok(());
        }
        Self::drag_to(state, doc, event)
    }

    fn on_pointer_up(
        state: &Rc<RefCell<Self>>,
        _doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        state.borrow_mut().dragging = false;
        Ok(())
    }

    fn on_thumb_focus(
        state: &Rc<RefCell<Self>>,
        _doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        state.borrow_mut().keyboard = true;
        Ok(())
    }

    fn on_thumb_blur(
        state: &Rc<RefCell<Self>>,
        _doc: &mut Document,
        _event: &mut Event,
    ) -> WidgetResult<()> {
        state.borrow_mut().keyboard = false;
        Ok(())
    }

    fn on_key_down(
        state: &Rc<RefCell<Self>>,
        doc: &mut Document,
        event: &mut Event,
    ) -> WidgetResult<()> {
        let Some(key) = event.key.as_ref() else {
            return Ok(());
        };
        let target = {
            let s = state.borrow();
            if !s.keyboard {
                return Ok(());
            }
            let step = if event.modifiers.shift { s.step * LARGE_STEP } else { s.step };
            match (Axis::Horizontal.intent_with_dir(key, s.dir), key) {
                (Some(NavIntent::Forward), _) | (None, Key::ArrowUp) => s.value + step,
                (Some(NavIntent::Backward), _) | (None, Key::ArrowDown) => s.value - step,
                (None, Key::PageUp) => s.value + s.step * LARGE_STEP,
                (None, Key::PageDown) => s.value - s.step * LARGE_STEP,
                (None, Key::Home) => s.min,
                (None, Key::End) => s.max,
                _ => return Ok(()),
            }
        };
        Self::change(state, doc, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akit_dom::{DomRect, KeyModifiers};

    const MARKUP: &str = r#"
        <div>
          <span data-type="track"><span data-type="range"></span></span>
          <span role="slider"></span>
          <button>after</button>
        </div>"#;

    fn attach(options: SliderOptions) -> (Document, Slider, NodeId, NodeId, Rc<RefCell<Vec<f64>>>) {
        let (mut doc, root) = akit_html::parse_fragment(MARKUP).unwrap();
        doc.tree.set_rect(root, DomRect::from_xywh(0.0, 0.0, 200.0, 20.0)).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let slider = Slider::attach(
            &mut doc,
            root,
            options.on_change(move |v| sink.borrow_mut().push(v)),
        )
        .unwrap();
        let thumb = doc.tree.query_selector(root, r#"[role="slider"]"#).unwrap().unwrap();
        (doc, slider, root, thumb, seen)
    }

    #[test]
    fn test_setup_writes_aria_and_offsets() {
        let (doc, slider, root, thumb, _) = attach(SliderOptions::default().value(25.0));

        assert_eq!(slider.value(), 25.0);
        assert_eq!(doc.tree.get_attribute(thumb, "aria-valuenow"), Some("25"));
        assert_eq!(doc.tree.get_attribute(thumb, "aria-valuemax"), Some("100"));
        assert_eq!(doc.tree.get_attribute(thumb, "tabindex"), Some("0"));
        assert_eq!(doc.tree.get_attribute(root, "dir"), Some("ltr"));
        assert_eq!(doc.tree.get_attribute(root, "data-orientation"), Some("horizontal"));
        assert_eq!(
            doc.tree.style_property(root, THUMB_OFFSET_PROPERTY).as_deref(),
            Some("calc(25% - 0px)")
        );
        assert_eq!(
            doc.tree.style_property(root, RANGE_OFFSET_PROPERTY).as_deref(),
            Some("calc(75% + 0px)")
        );
    }

    #[test]
    fn test_keyboard_needs_focus() {
        let (mut doc, slider, root, thumb, seen) = attach(SliderOptions::default());

        doc.key_down(Key::ArrowRight);
        assert_eq!(slider.value(), 0.0);

        doc.focus(thumb);
        doc.key_down(Key::ArrowRight);
        doc.key_down_with(Key::ArrowUp, KeyModifiers::SHIFT);
        doc.key_down(Key::Shift);
        assert_eq!(slider.value(), 11.0);
        doc.key_down(Key::PageDown);
        assert_eq!(slider.value(), 1.0);
        doc.key_down(Key::End);
        assert_eq!(slider.value(), 100.0);
        doc.key_down(Key::PageUp);
        assert_eq!(*seen.borrow(), vec![1.0, 11.0, 1.0, 100.0]);

        let after = doc.tree.query_selector(root, "button").unwrap().unwrap();
        doc.focus(after);
        doc.key_down(Key::Home);
        assert_eq!(slider.value(), 100.0);
    }

    #[test]
    fn test_rtl_inverts_horizontal_keys() {
        let (mut doc, slider, _, thumb, _) =
            attach(SliderOptions::default().value(50.0).dir(TextDirection::Rtl));

        doc.focus(thumb);
        doc.key_down(Key::ArrowRight);
        assert_eq!(slider.value(), 49.0);
        doc.key_down(Key::ArrowUp);
        assert_eq!(slider.value(), 50.0);
    }

    #[test]
    fn test_fractional_steps_are_rounded() {
        let (mut doc, slider, _, thumb, _) =
            attach(SliderOptions::default().range(0.0, 1.0).step(0.1).value(0.3));

        doc.focus(thumb);
        doc.key_down(Key::ArrowRight);
        assert_eq!(slider.value(), 0.4);
    }

    #[test]
    fn test_drag() {
        let (mut doc, slider, root, _, _) = attach(SliderOptions::default());

        doc.pointer_down(root, 50.0, 10.0);
        assert!(slider.is_dragging());
        assert_eq!(slider.value(), 25.0);

        doc.pointer_move(EventTarget::Window, 101.0, 0.0);
        assert_eq!(slider.value(), 51.0);
        doc.pointer_move(EventTarget::Window, 400.0, 0.0);
        assert_eq!(slider.value(), 100.0);

        doc.pointer_up(EventTarget::Window, 0.0, 0.0);
        doc.pointer_move(EventTarget::Window, 0.0, 0.0);
        assert_eq!(slider.value(), 100.0);
        assert!(!slider.is_dragging());
    }

    #[test]
    fn test_vertical_drag_measures_from_bottom() {
        let (mut doc, slider, root, _, _) =
            attach(SliderOptions::default().orientation(Orientation::Vertical));
        doc.tree.set_rect(root, DomRect::from_xywh(0.0, 0.0, 20.0, 100.0)).unwrap();

        doc.pointer_down(root, 10.0, 75.0);
        assert_eq!(slider.value(), 25.0);
    }

    #[test]
    fn test_non_finite_options_are_rejected() {
        let (mut doc, root) = akit_html::parse_fragment(MARKUP).unwrap();

        let err =
            Slider::attach(&mut doc, root, SliderOptions::default().range(f64::NAN, 10.0)).err();
        assert_eq!(
            err,
            Some(WidgetError::NotFinite {
                widget: "slider",
                option: "min"
            })
        );
        let err =
            Slider::attach(&mut doc, root, SliderOptions::default().value(f64::INFINITY)).err();
        assert!(matches!(err, Some(WidgetError::NotFinite { option: "value", .. })));
    }

    #[test]
    fn test_set_value_ignores_nan() {
        let (mut doc, slider, _, thumb, _) = attach(SliderOptions::default().value(30.0));

        slider.set_value(&mut doc, f64::NAN).unwrap();
        assert_eq!(slider.value(), 30.0);
        slider.set_value(&mut doc, f64::INFINITY).unwrap();
        assert_eq!(slider.value(), 100.0);
        assert_eq!(doc.tree.get_attribute(thumb, "aria-valuenow"), Some("100"));
    }
}
