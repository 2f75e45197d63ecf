//! Navigation state machine
//!
//! Two states, Disarmed and Armed. Arrow-key intents only move the
//! selection while armed; pointer-up anywhere and Tab keydown disarm
//! without touching the selection.

use akit_a11y::{step_index, NavIntent};

/// Armed flag and selected index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavState {
    pub armed: bool,
    /// `None` means nothing highlighted
    pub selected: Option<usize>,
}

/// Machine inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavInput {
    /// Focus entered the container; select `index`, the current item, or 0
    Arm { index: Option<usize> },
    /// Pointer-up anywhere or Tab keydown
    Disarm,
    /// Arrow key along the widget's axis
    Intent(NavIntent),
    /// Click or pointer on an item
    Pick(usize),
    /// Escape, Tab or leaving an overlay
    Dismiss,
}

/// Selection change to hand to the applier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub previous: Option<usize>,
    pub selected: Option<usize>,
}

/// State machine over a list of `count` items
#[derive(Debug, Clone)]
pub struct NavMachine {
    state: NavState,
    count: usize,
    wrap: bool,
}

impl NavMachine {
    /// Create a disarmed machine with nothing selected
    pub fn new(count: usize, wrap: bool) -> Self {
        Self {
            state: NavState::default(),
            count,
            wrap,
        }
    }

    /// Start with `selected` (ignored when out of range)
    pub fn with_selected(mut self, selected: Option<usize>) -> Self {
        self.state.selected = selected.filter(|&i| i < self.count);
        self
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected
    }

    pub fn is_armed(&self) -> bool {
        self.state.armed
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Feed one input; returns the selection change to apply, if any
    pub fn handle(&mut self, input: NavInput) -> Option<Transition> {
        let previous = self.state.selected;

        let transition = match input {
            NavInput::Arm { index } => {
                let was_armed = self.state.armed;
                self.state.armed = true;
                let target = index
                    .filter(|&i| i < self.count)
                    .or(previous)
                    .or((self.count > 0).then_some(0));
                self.state.selected = target;
                (!was_armed || target != previous).then_some(Transition {
                    previous,
                    selected: target,
                })
            }
            NavInput::Disarm => {
                self.state.armed = false;
                None
            }
            NavInput::Intent(intent) => {
                if !self.state.armed {
                    return None;
                }
                let target = step_index(self.count, previous, intent, self.wrap);
                self.state.selected = target;
                (target != previous).then_some(Transition {
                    previous,
                    selected: target,
                })
            }
            NavInput::Pick(index) => {
                if index >= self.count {
                    return None;
                }
                self.state.armed = true;
                self.state.selected = Some(index);
                Some(Transition {
                    previous,
                    selected: Some(index),
                })
            }
            NavInput::Dismiss => {
                let was_armed = self.state.armed;
                self.state.armed = false;
                self.state.selected = None;
                (was_armed || previous.is_some()).then_some(Transition {
                    previous,
                    selected: None,
                })
            }
        };

        if let Some(t) = transition {
            tracing::trace!(previous = ?t.previous, selected = ?t.selected, "nav transition");
        }
        transition
    }

    /// Set the selection without changing the armed flag
    pub fn select(&mut self, index: Option<usize>) -> Option<Transition> {
        let previous = self.state.selected;
        let index = index.filter(|&i| i < self.count);
        self.state.selected = index;
        (index != previous).then_some(Transition {
            previous,
            selected: index,
        })
    }

    /// Set the armed flag directly, for widgets whose owner controls it
    pub fn set_armed(&mut self, armed: bool) {
        self.state.armed = armed;
    }

    pub fn arm(&mut self, index: Option<usize>) -> Option<Transition> {
        self.handle(NavInput::Arm { index })
    }

    pub fn disarm(&mut self) {
        self.handle(NavInput::Disarm);
    }

    pub fn intent(&mut self, intent: NavIntent) -> Option<Transition> {
        self.handle(NavInput::Intent(intent))
    }

    pub fn pick(&mut self, index: usize) -> Option<Transition> {
        self.handle(NavInput::Pick(index))
    }

    pub fn dismiss(&mut self) -> Option<Transition> {
        self.handle(NavInput::Dismiss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_ignored_while_disarmed() {
        let mut nav = NavMachine::new(3, true).with_selected(Some(0));

        assert_eq!(nav.intent(NavIntent::Forward), None);
        assert_eq!(nav.selected(), Some(0));
    }

    #[test]
    fn test_arm_enters_at_zero() {
        let mut nav = NavMachine::new(3, true);

        assert_eq!(nav.arm(None), Some(Transition { previous: None, selected: Some(0) }));
        assert!(nav.is_armed());
        assert_eq!(nav.arm(None), None);
        assert_eq!(nav.arm(Some(2)), Some(Transition { previous: Some(0), selected: Some(2) }));
    }

    #[test]
    fn test_rearm_reports_entry() {
        let mut nav = NavMachine::new(3, true).with_selected(Some(1));
        nav.arm(None);
        nav.disarm();

        assert_eq!(nav.arm(None), Some(Transition { previous: Some(1), selected: Some(1) }));
    }

    #[test]
    fn test_wrapping_intents() {
        let mut nav = NavMachine::new(3, true);
        nav.arm(None);

        nav.intent(NavIntent::Forward);
        nav.intent(NavIntent::Forward);
        assert_eq!(nav.selected(), Some(2));
        nav.intent(NavIntent::Forward);
        assert_eq!(nav.selected(), Some(0));
        nav.intent(NavIntent::Backward);
        assert_eq!(nav.selected(), Some(2));
    }

    #[test]
    fn test_clamping_intents() {
        let mut nav = NavMachine::new(2, false);
        nav.arm(None);
        nav.dismiss();
        nav.arm(None);
        nav.select(None);

        assert_eq!(nav.intent(NavIntent::Backward), None);
        assert_eq!(
            nav.intent(NavIntent::Forward),
            Some(Transition { previous: None, selected: Some(0) })
        );
        nav.intent(NavIntent::Forward);
        assert_eq!(nav.intent(NavIntent::Forward), None);
        assert_eq!(nav.selected(), Some(1));
    }

    #[test]
    fn test_pick_arms_and_dismiss_resets() {
        let mut nav = NavMachine::new(4, true);

        assert!(nav.pick(3).is_some());
        assert!(nav.is_armed());
        assert_eq!(nav.pick(9), None);

        assert_eq!(nav.dismiss(), Some(Transition { previous: Some(3), selected: None }));
        assert_eq!(nav.state(), NavState { armed: false, selected: None });
        assert_eq!(nav.dismiss(), None);
    }

    #[test]
    fn test_empty_list_never_selects() {
        let mut nav = NavMachine::new(0, true);

        assert_eq!(nav.arm(None), Some(Transition { previous: None, selected: None }));
        assert_eq!(nav.intent(NavIntent::Forward), None);
        assert_eq!(nav.selected(), None);
    }
}
