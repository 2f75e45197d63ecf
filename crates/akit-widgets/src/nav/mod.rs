//! List Navigation Controller
//!
//! The roving-focus core shared by every composite widget:
//! - `resolve`: map an event target back to the item that contains it
//! - `machine`: armed/disarmed state and the selected index
//! - `apply`: write markers, tab indexes and panel state for a selection
//!
//! Widgets differ only in their axis, marker and panel configuration.

pub mod apply;
pub mod machine;
pub mod resolve;

pub use apply::{
    apply_selection, set_disclosure, suspend_tab_stop, ApplyOptions, Marker, MarkerTarget, NavItem,
};
pub use machine::{NavInput, NavMachine, NavState, Transition};
pub use resolve::{element_index, inclusive_query, item_index, resolve_direct_child};
