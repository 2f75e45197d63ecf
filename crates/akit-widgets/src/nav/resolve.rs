//! Direct-child resolution
//!
//! Event targets are usually nested inside an item (an icon inside a
//! button inside a list item); these helpers walk up to the item.

use akit_dom::{DomTree, NodeId, Selector};

/// Walk up from `descendant` to the node whose parent is `container`
///
/// A node without a parent ends the walk and is returned as is, so a
/// detached subtree resolves to its own root. The walk is iterative and
/// terminates because tree ancestry is acyclic.
pub fn resolve_direct_child(tree: &DomTree, container: NodeId, descendant: NodeId) -> NodeId {
    let mut current = descendant;
    loop {
        match tree.parent(current) {
            Some(parent) if parent != container => current = parent,
            _ => return current,
        }
    }
}

/// Position among the container's element children of the child holding `node`
pub fn element_index(tree: &DomTree, container: NodeId, node: NodeId) -> Option<usize> {
    let child = resolve_direct_child(tree, container, node);
    tree.element_children(container).iter().position(|&c| c == child)
}

/// Position in `items` of the nearest inclusive ancestor of `node`
///
/// For item lists that are not direct children (toolbar buttons, select
/// options). The walk stops at `container`.
pub fn item_index(
    tree: &DomTree,
    items: &[NodeId],
    container: NodeId,
    node: NodeId,
) -> Option<usize> {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .take_while(|&n| n != container)
        .find_map(|n| items.iter().position(|&item| item == n))
}

/// `root` itself if it matches, else its first matching descendant
pub fn inclusive_query(tree: &DomTree, root: NodeId, selector: &Selector) -> Option<NodeId> {
    if tree.matches_selector(root, selector) {
        Some(root)
    } else {
        tree.query_first(root, selector)
    }
}
