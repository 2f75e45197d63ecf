//! anatomykit Accessibility
//!
//! Shared ARIA vocabulary for the widget behaviors:
//! - Roles, attribute names and `data-state` values
//! - Tab index parsing and the roving tab index writer
//! - Key-to-intent mapping and wraparound index arithmetic

pub mod aria;
pub mod focus;
pub mod keyboard_nav;

pub use aria::{AriaRole, DataState, Orientation, TextDirection};
pub use focus::{set_roving_tabindex, TabIndex};
pub use keyboard_nav::{next_index, previous_index, step_index, Axis, NavIntent};

/// Errors reading ARIA values from markup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum A11yError {
    #[error("unknown orientation `{0}`")]
    InvalidOrientation(String),

    #[error("unknown text direction `{0}`")]
    InvalidDirection(String),
}
