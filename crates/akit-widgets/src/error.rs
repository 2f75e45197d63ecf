//! Widget Errors
//!
//! Configuration errors raised while attaching a widget to markup.

use akit_dom::{DomError, DomTree, NodeId};

/// Result type for widget operations
pub type WidgetResult<T> = Result<T, WidgetError>;

/// Widget errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    /// A required structural element is absent
    #[error("{widget}: required element `{what}` is missing")]
    MissingElement { widget: &'static str, what: String },

    /// A list that must have entries is empty
    #[error("{widget}: no {what} found")]
    Empty { widget: &'static str, what: &'static str },

    /// A numeric option is NaN or infinite
    #[error("{widget}: option `{option}` must be finite")]
    NotFinite { widget: &'static str, option: &'static str },

    /// A tab has no matching panel
    #[error("{widget}: item {index} has no panel")]
    MissingPanel { widget: &'static str, index: usize },

    #[error(transparent)]
    Dom(#[from] DomError),
}

impl WidgetError {
    pub(crate) fn missing(widget: &'static str, what: impl Into<String>) -> Self {
        Self::MissingElement {
            widget,
            what: what.into(),
        }
    }
}

/// First descendant of `root` matching `selector`, or a configuration error
pub(crate) fn require(
    tree: &DomTree,
    root: NodeId,
    selector: &str,
    widget: &'static str,
) -> WidgetResult<NodeId> {
    tree.query_selector(root, selector)?
        .ok_or_else(|| WidgetError::missing(widget, selector))
}
