//! DOM Node
//!
//! Nodes link to each other through `NodeId`s into the tree arena
//! instead of pointers, so the tree can be mutated from event handlers
//! without reference cycles.

use crate::{AttrMap, DomRect, NodeId};

/// Arena slot: sibling and parent links plus the payload
#[derive(Debug)]
pub struct Node {
    pub parent: NodeId,
    pub first_child: NodeId,
    /// Kept so appends don't walk the sibling chain
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
    pub data: NodeData,
}

impl Node {
    fn detached(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    pub fn element(tag: &str) -> Self {
        Self::detached(NodeData::Element(ElementData::new(tag)))
    }

    pub fn text(content: &str) -> Self {
        Self::detached(NodeData::Text(content.to_string()))
    }

    pub fn comment(content: &str) -> Self {
        Self::detached(NodeData::Comment(content.to_string()))
    }

    pub fn document() -> Self {
        Self::detached(NodeData::Document)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.as_element().is_some()
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Contents of a text node; comments don't count
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
    /// Parsed and kept so sibling walks match the source markup
    Comment(String),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    /// Attributes in insertion order
    pub attrs: AttrMap,
    /// Client rect supplied by the embedder, if laid out
    pub rect: Option<DomRect>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: AttrMap::new(),
            rect: None,
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    /// Whitespace-separated class list
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs.get("class").unwrap_or_default().split_whitespace()
    }
}
