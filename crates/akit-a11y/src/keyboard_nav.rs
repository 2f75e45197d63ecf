//! Keyboard Navigation
//!
//! Arrow keys map to a forward/backward intent along a widget's axis;
//! intents move a selection through an ordered list.

use akit_dom::Key;

use crate::{Orientation, TextDirection};

/// Direction of travel through a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    Forward,
    Backward,
}

/// Which arrow keys drive a widget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Axis {
    /// ArrowLeft / ArrowRight
    #[default]
    Horizontal,
    /// ArrowUp / ArrowDown
    Vertical,
}

impl Axis {
    /// Intent for a key, or `None` for keys off this axis
    pub fn intent(self, key: &Key) -> Option<NavIntent> {
        match (self, key) {
            (Self::Horizontal, Key::ArrowRight) | (Self::Vertical, Key::ArrowDown) => {
                Some(NavIntent::Forward)
            }
            (Self::Horizontal, Key::ArrowLeft) | (Self::Vertical, Key::ArrowUp) => {
                Some(NavIntent::Backward)
            }
            _ => None,
        }
    }

    /// Intent with right-to-left text flipping the horizontal keys
    pub fn intent_with_dir(self, key: &Key, dir: TextDirection) -> Option<NavIntent> {
        let intent = self.intent(key)?;
        Some(match (self, dir) {
            (Self::Horizontal, TextDirection::Rtl) => intent.reversed(),
            _ => intent,
        })
    }
}

impl From<Orientation> for Axis {
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Horizontal => Self::Horizontal,
            Orientation::Vertical => Self::Vertical,
        }
    }
}

impl NavIntent {
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Next index with wraparound; `count` must be non-zero
#[inline]
pub fn next_index(count: usize, current: usize) -> usize {
    if current + 1 < count { current + 1 } else { 0 }
}

/// Previous index with wraparound; `count` must be non-zero
#[inline]
pub fn previous_index(count: usize, current: usize) -> usize {
    if current > 0 { current - 1 } else { count.saturating_sub(1) }
}

/// Move a possibly empty selection one step
///
/// Entering from `None`: forward lands on the first item; backward lands
/// on the last item when wrapping and stays `None` when clamping. An
/// empty list never has a selection.
pub fn step_index(
    count: usize,
    current: Option<usize>,
    intent: NavIntent,
    wrap: bool,
) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let last = count - 1;

    match (current, intent) {
        (None, NavIntent::Forward) => Some(0),
        (None, NavIntent::Backward) => wrap.then_some(last),
        (Some(i), NavIntent::Forward) if wrap => Some(next_index(count, i.min(last))),
        (Some(i), NavIntent::Backward) if wrap => Some(previous_index(count, i.min(last))),
        (Some(i), NavIntent::Forward) => Some((i + 1).min(last)),
        (Some(i), NavIntent::Backward) => Some(i.min(last).saturating_sub(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wraparound() {
        assert_eq!(next_index(4, 3), 0);
        assert_eq!(previous_index(4, 0), 3);
        assert_eq!(next_index(1, 0), 0);
        assert_eq!(previous_index(1, 0), 0);
    }

    #[test]
    fn test_axis_keys() {
        assert_eq!(Axis::Horizontal.intent(&Key::ArrowRight), Some(NavIntent::Forward));
        assert_eq!(Axis::Horizontal.intent(&Key::ArrowDown), None);
        assert_eq!(Axis::Vertical.intent(&Key::ArrowUp), Some(NavIntent::Backward));
        assert_eq!(
            Axis::Horizontal.intent_with_dir(&Key::ArrowRight, TextDirection::Rtl),
            Some(NavIntent::Backward)
        );
        assert_eq!(
            Axis::Vertical.intent_with_dir(&Key::ArrowDown, TextDirection::Rtl),
            Some(NavIntent::Forward)
        );
    }

    #[test]
    fn test_step_clamps_without_wrap() {
        assert_eq!(step_index(3, Some(2), NavIntent::Forward, false), Some(2));
        assert_eq!(step_index(3, Some(0), NavIntent::Backward, false), Some(0));
        assert_eq!(step_index(3, None, NavIntent::Backward, false), None);
        assert_eq!(step_index(3, None, NavIntent::Backward, true), Some(2));
        assert_eq!(step_index(0, Some(0), NavIntent::Forward, true), None);
    }

    proptest! {
        #[test]
        fn test_inverse_laws(count in 1usize..64, seed in 0usize..64) {
            let i = seed % count;
            prop_assert_eq!(next_index(count, previous_index(count, i)), i);
            prop_assert_eq!(previous_index(count, next_index(count, i)), i);
        }

        #[test]
        fn test_step_stays_in_bounds(
            count in 1usize..32,
            start in proptest::option::of(0usize..32),
            forward: bool,
            wrap: bool,
        ) {
            let intent = if forward { NavIntent::Forward } else { NavIntent::Backward };
            if let Some(i) = step_index(count, start, intent, wrap) {
                prop_assert!(i < count);
            }
        }
    }
}
