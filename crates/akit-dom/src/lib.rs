//! anatomykit DOM - Document Object Model
//!
//! Arena-backed DOM tree that widget behaviors attach to.
//!
//! Features:
//! - Element/text nodes with parent and sibling links
//! - Ordered attribute maps with `set_attributes` helper semantics
//! - Compound selector queries (`[role="tab"]`, `:not(...)`, ...)
//! - Event dispatch with bubbling to the window target
//! - Disposable listener subscriptions
//! - Focus tracking and deferred tasks

mod attributes;
mod document;
mod events;
mod geometry;
mod listeners;
mod node;
mod selector;
mod tree;

pub use attributes::{AttrMap, AttrValue};
pub use document::Document;
pub use events::{Event, EventTarget, EventType, Key, KeyModifiers};
pub use geometry::DomRect;
pub use listeners::{Listener, Subscription, Subscriptions};
pub use node::{ElementData, Node, NodeData};
pub use selector::Selector;
pub use tree::{Ancestors, Children, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    /// Convert the sentinel into `None`
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("node {0} not found")]
    NotFound(NodeId),

    /// Inserting a node below itself or one of its descendants
    #[error("hierarchy request error: {child} cannot be inserted under {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    /// Node is not an element
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    /// Node is not a child of the given parent
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Selector could not be parsed
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
}
