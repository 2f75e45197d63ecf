//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: removing a node only detaches it, so `NodeId`s
//! held by widgets stay valid for the lifetime of the tree.

use crate::{AttrValue, DomError, DomRect, DomResult, Node, NodeData, NodeId, Selector};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NotFound(id))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.node(parent)?;
        self.node(child)?;
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;

        Ok(child)
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.node(child)?.parent != parent {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(child)
    }

    fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id.index()];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    /// Iterate over child node ids
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Element children in order
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).filter(|&c| self.is_element(c)).collect()
    }

    /// Ancestors from the parent upwards (excluding `id`)
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id).unwrap_or(NodeId::NONE),
        }
    }

    /// All descendants in pre-order (excluding `id`)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).collect();
        stack.reverse();

        while let Some(current) = stack.pop() {
            out.push(current);
            let start = stack.len();
            stack.extend(self.children(current));
            stack[start..].reverse();
        }
        out
    }

    /// Inclusive containment check
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Check whether a node is an element
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.tag.as_str())
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    /// Find the first element in the document with the given `id`
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|&n| self.get_attribute(n, "id") == Some(id))
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut crate::ElementData> {
        self.node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    /// Get an attribute value
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.get_attr(name)
    }

    /// Check if attribute exists
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_mut(id)?.attrs.set(name, value);
        Ok(())
    }

    /// Remove an attribute (absent is fine)
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<()> {
        self.element_mut(id)?.attrs.remove(name);
        Ok(())
    }

    /// Toggle an attribute, returning whether it is now present
    pub fn toggle_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        force: Option<bool>,
    ) -> DomResult<bool> {
        Ok(self.element_mut(id)?.attrs.toggle(name, force))
    }

    /// Bulk update; `AttrValue::Bool(false)` removes the attribute
    pub fn set_attributes<N, V>(
        &mut self,
        id: NodeId,
        attrs: impl IntoIterator<Item = (N, V)>,
    ) -> DomResult<()>
    where
        N: AsRef<str>,
        V: Into<AttrValue>,
    {
        let element = self.element_mut(id)?;
        for (name, value) in attrs {
            element.attrs.apply(name.as_ref(), &value.into());
        }
        Ok(())
    }

    /// Read one declaration from the inline `style` attribute
    pub fn style_property(&self, id: NodeId, property: &str) -> Option<String> {
        let style = self.get_attribute(id, "style")?;
        parse_declarations(style)
            .into_iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Set one declaration in the inline `style` attribute
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) -> DomResult<()> {
        let mut declarations =
            parse_declarations(self.get_attribute(id, "style").unwrap_or_default());
        match declarations.iter_mut().find(|(name, _)| name == property) {
            Some(existing) => existing.1 = value.to_string(),
            None => declarations.push((property.to_string(), value.to_string())),
        }

        let style = declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attribute(id, "style", &style)
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Client rect of an element, if the embedder supplied one
    pub fn rect(&self, id: NodeId) -> Option<DomRect> {
        self.get(id)?.as_element()?.rect
    }

    /// Record the client rect of an element
    pub fn set_rect(&mut self, id: NodeId, rect: DomRect) -> DomResult<()> {
        self.element_mut(id)?.rect = Some(rect);
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Check if a node is an element matching `selector`
    pub fn matches_selector(&self, id: NodeId, selector: &Selector) -> bool {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element(e)) => selector.matches(e),
            _ => false,
        }
    }

    /// Parse `selector` and test one element
    pub fn matches(&self, id: NodeId, selector: &str) -> DomResult<bool> {
        Ok(self.matches_selector(id, &Selector::parse(selector)?))
    }

    /// First matching descendant in document order
    pub fn query_first(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&d| self.matches_selector(d, selector))
    }

    /// All matching descendants in document order
    pub fn query_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&d| self.matches_selector(d, selector))
            .collect()
    }

    /// `Element.querySelector`
    pub fn query_selector(&self, root: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        Ok(self.query_first(root, &Selector::parse(selector)?))
    }

    /// `Element.querySelectorAll`
    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        Ok(self.query_all(root, &Selector::parse(selector)?))
    }

    /// Nearest inclusive ancestor matching `selector`
    pub fn closest(&self, id: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&n| self.matches_selector(n, &selector)))
    }
}

/// Split `a: b; c: d` into name/value pairs
fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Iterator over a node's children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.to_option()?;
        self.next = self.tree.get(current).map_or(NodeId::NONE, |n| n.next_sibling);
        Some(current)
    }
}

/// Iterator over a node's ancestors
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.to_option()?;
        self.next = self.tree.get(current).map_or(NodeId::NONE, |n| n.parent);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(tree: &mut DomTree, n: usize) -> (NodeId, Vec<NodeId>) {
        let ul = tree.create_element("ul");
        tree.append_child(tree.root(), ul).unwrap();
        let items = (0..n)
            .map(|_| {
                let li = tree.create_element("li");
                tree.append_child(ul, li).unwrap()
            })
            .collect();
        (ul, items)
    }

    #[test]
    fn test_append_and_children() {
        let mut tree = DomTree::new();
        let (ul, items) = list(&mut tree, 3);

        assert_eq!(tree.children(ul).collect::<Vec<_>>(), items);
        assert_eq!(tree.parent(items[1]), Some(ul));
        assert_eq!(tree.get(items[1]).unwrap().prev_sibling, items[0]);
    }

    #[test]
    fn test_reparent_moves_node() {
        let mut tree = DomTree::new();
        let (ul, items) = list(&mut tree, 3);
        let other = tree.create_element("div");

        tree.append_child(other, items[1]).unwrap();

        assert_eq!(tree.element_children(ul), vec![items[0], items[2]]);
        assert_eq!(tree.children(other).collect::<Vec<_>>(), vec![items[1]]);
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = DomTree::new();
        let (ul, items) = list(&mut tree, 1);

        assert_eq!(
            tree.append_child(items[0], ul),
            Err(DomError::HierarchyRequest { parent: items[0], child: ul })
        );
        assert_eq!(
            tree.append_child(ul, ul),
            Err(DomError::HierarchyRequest { parent: ul, child: ul })
        );
    }

    #[test]
    fn test_remove_child() {
        let mut tree = DomTree::new();
        let (ul, items) = list(&mut tree, 3);

        tree.remove_child(ul, items[0]).unwrap();
        assert_eq!(tree.element_children(ul), vec![items[1], items[2]]);
        assert_eq!(tree.parent(items[0]), None);
        assert!(matches!(tree.remove_child(ul, items[0]), Err(DomError::NotAChild { .. })));
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = DomTree::new();
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        let c = tree.create_element("c");
        let d = tree.create_element("d");
        tree.append_child(tree.root(), a).unwrap();
        tree.append_child(a, b).unwrap();
        tree.append_child(b, c).unwrap();
        tree.append_child(a, d).unwrap();

        assert_eq!(tree.descendants(tree.root()), vec![a, b, c, d]);
        assert_eq!(tree.descendants(a), vec![b, c, d]);
    }

    #[test]
    fn test_set_attributes_semantics() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.set_attribute(div, "hidden", "").unwrap();

        tree.set_attributes(
            div,
            [
                ("hidden", AttrValue::Bool(false)),
                ("aria-expanded", AttrValue::Bool(true)),
                ("tabindex", AttrValue::Int(-1)),
            ],
        )
        .unwrap();

        assert!(!tree.has_attribute(div, "hidden"));
        assert_eq!(tree.get_attribute(div, "aria-expanded"), Some("true"));
        assert_eq!(tree.get_attribute(div, "tabindex"), Some("-1"));
    }

    #[test]
    fn test_text_node_attribute_error() {
        let mut tree = DomTree::new();
        let text = tree.create_text("hi");
        assert_eq!(
            tree.set_attribute(text, "id", "x"),
            Err(DomError::NotAnElement(text))
        );
        assert_eq!(tree.text_content(text), "hi");
    }

    #[test]
    fn test_style_properties() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.set_attribute(div, "style", "color: red").unwrap();

        tree.set_style_property(div, "--akit-thumb-offset", "calc(50% - 0px)").unwrap();
        tree.set_style_property(div, "color", "blue").unwrap();

        assert_eq!(
            tree.get_attribute(div, "style"),
            Some("color: blue; --akit-thumb-offset: calc(50% - 0px)")
        );
        assert_eq!(
            tree.style_property(div, "--akit-thumb-offset").as_deref(),
            Some("calc(50% - 0px)")
        );
    }

    #[test]
    fn test_query_excludes_root() {
        let mut tree = DomTree::new();
        let (ul, items) = list(&mut tree, 2);
        tree.set_attribute(items[1], "role", "option").unwrap();

        assert_eq!(tree.query_selector(ul, "ul").unwrap(), None);
        assert_eq!(tree.query_selector(ul, "li").unwrap(), Some(items[0]));
        assert_eq!(tree.query_selector(ul, r#"[role="option"]"#).unwrap(), Some(items[1]));
        assert_eq!(tree.closest(items[1], "ul").unwrap(), Some(ul));
    }
}
