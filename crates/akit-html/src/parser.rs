//! HTML5 Parser implementation
//!
//! Parses with html5ever into an `RcDom`, then copies the result into
//! the arena tree. Whitespace-only text nodes are dropped.

use akit_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// HTML5 parser
#[derive(Debug, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut tree = DomTree::new();
        let root = tree.root();
        self.convert_node(&dom.document, &mut tree, root)?;

        tracing::debug!(nodes = tree.len(), "parsed document");
        Ok(Document::with_tree(tree))
    }

    /// Parse a fragment and locate its first element inside `<body>`
    pub fn parse_fragment(&self, html: &str) -> Result<(Document, NodeId), ParseError> {
        let document = self.parse(html)?;
        let body = document
            .tree
            .query_selector(document.tree.root(), "body")?
            .ok_or(ParseError::EmptyFragment)?;
        let first = document
            .tree
            .element_children(body)
            .first()
            .copied()
            .ok_or(ParseError::EmptyFragment)?;
        Ok((document, first))
    }

    fn convert_node(
        &self,
        handle: &Handle,
        tree: &mut DomTree,
        parent: NodeId,
    ) -> Result<(), ParseError> {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent)?;
                }
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if !text.trim().is_empty() {
                    let id = tree.create_text(&text);
                    tree.append_child(parent, id)?;
                }
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    tree.set_attribute(id, &attr.name.local, &attr.value)?;
                }
                tree.append_child(parent, id)?;

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id)?;
                }
            }
            RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => {}
        }
        Ok(())
    }
}
