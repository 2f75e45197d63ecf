//! Focus Management
//!
//! Tab index values and the roving tab index pattern: exactly one part
//! of a composite widget sits in the tab order.

use akit_dom::{DomResult, DomTree, NodeId};

use crate::aria::attr;

/// Tab index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// `tabindex="-1"` or any negative value
    NotFocusable,
    /// `tabindex="0"` or positive
    Sequential(i32),
}

impl TabIndex {
    /// In the tab order (`"0"`)
    pub const IN_ORDER: Self = Self::Sequential(0);

    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Self::NotFocusable,
            Ok(n) => Self::Sequential(n),
            Err(_) => Self::NotFocusable,
        }
    }

    /// Roving value: `0` for the current part, `-1` for the rest
    pub fn roving(current: bool) -> Self {
        if current { Self::IN_ORDER } else { Self::NotFocusable }
    }

    pub fn is_focusable(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }

    /// Attribute value
    pub fn as_attr(&self) -> String {
        match self {
            Self::NotFocusable => "-1".to_string(),
            Self::Sequential(n) => n.to_string(),
        }
    }
}

/// Give `parts[current]` `tabindex="0"` and every other part `"-1"`
///
/// With `current == None` every part is taken out of the tab order.
pub fn set_roving_tabindex(
    tree: &mut DomTree,
    parts: &[NodeId],
    current: Option<usize>,
) -> DomResult<()> {
    tracing::trace!(parts = parts.len(), ?current, "roving tabindex");
    for (index, &part) in parts.iter().enumerate() {
        let value = TabIndex::roving(Some(index) == current).as_attr();
        tree.set_attribute(part, attr::TABINDEX, &value)?;
    }
    Ok(())
}
