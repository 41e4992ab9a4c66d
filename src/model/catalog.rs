//! Immutable catalog tree.
//!
//! Nodes live in a flat arena addressed by [`NodeIndex`]; parent and child
//! links are indices. The tree is built once by [`crate::parser`] and then
//! shared read-only (usually behind an `Arc`).

use super::identifiers::NodeId;
use super::node::{Node, NodeIndex, NodeKind};
use std::collections::HashMap;

/// Read-only n-ary catalog tree with unique node ids.
///
/// Invariants (enforced by the parser):
/// - index 0 is the root and has kind [`NodeKind::Root`]
/// - ids are unique across the whole tree
/// - every non-root node has exactly one parent
#[derive(Debug, Clone)]
pub struct CatalogTree {
    nodes: Vec<Node>,
    by_id: HashMap<NodeId, NodeIndex>,
}

impl CatalogTree {
    pub(crate) const ROOT: NodeIndex = NodeIndex(0);

    /// Assemble a tree from already-validated arena parts.
    pub(crate) fn from_parts(nodes: Vec<Node>, by_id: HashMap<NodeId, NodeIndex>) -> Self {
        debug_assert!(!nodes.is_empty(), "catalog arena must contain the root");
        Self { nodes, by_id }
    }

    /// Position of the root node.
    pub fn root_index(&self) -> NodeIndex {
        Self::ROOT
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT.0]
    }

    /// Node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` did not come from this tree.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.0]
    }

    /// Node at `index`, or None if out of range.
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.0)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve an id anywhere in the tree.
    pub fn find_by_id(&self, id: &str) -> Option<NodeIndex> {
        NodeId::new(id)
            .ok()
            .and_then(|id| self.by_id.get(&id).copied())
    }

    /// Node with the given id, if present.
    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.find_by_id(id).map(|index| self.node(index))
    }

    /// Child of `parent` whose id is `id`.
    pub fn child_by_id(&self, parent: NodeIndex, id: &str) -> Option<NodeIndex> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).id.as_str() == id)
    }

    /// Ordered children of `index`.
    pub fn children(&self, index: NodeIndex) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.node(index)
            .children
            .iter()
            .map(move |&child| (child, self.node(child)))
    }

    /// Parent of `index` (None for the root).
    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.node(index).parent
    }

    /// Root-first path ending at `id`, or None if the id is absent.
    ///
    /// Ids are unique, so the path is unique; it is reconstructed from parent
    /// links rather than by searching.
    pub fn path_to(&self, id: &str) -> Option<Vec<NodeIndex>> {
        self.find_by_id(id).map(|index| self.path_to_index(index))
    }

    /// Root-first path ending at `index`.
    pub fn path_to_index(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut path = vec![index];
        let mut cursor = index;
        while let Some(parent) = self.node(cursor).parent {
            path.push(parent);
            cursor = parent;
        }
        path.reverse();
        path
    }

    /// Depth-first (pre-order) list of all nodes of a kind.
    pub fn find_by_kind(&self, kind: NodeKind) -> Vec<NodeIndex> {
        self.descendants(Self::ROOT)
            .filter(|&index| self.node(index).kind == kind)
            .collect()
    }

    /// Pre-order walk of `start` and everything below it.
    pub fn descendants(&self, start: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        let mut stack = vec![start];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.node(next).children.iter().rev().copied());
            Some(next)
        })
    }

    /// Nearest node on the root-first path to `index` (inclusive) with the given kind.
    pub fn nearest_ancestor_of_kind(&self, index: NodeIndex, kind: NodeKind) -> Option<NodeIndex> {
        let mut cursor = Some(index);
        while let Some(current) = cursor {
            if self.node(current).kind == kind {
                return Some(current);
            }
            cursor = self.node(current).parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_catalog;

    const SAMPLE: &str = r#"{
        "id": "root", "type": "root", "label": "Lentes",
        "children": [
            { "id": "longe", "type": "category", "label": "Longe", "children": [
                { "id": "longe-marcas", "type": "subcategory", "label": "Por Marca", "children": [
                    { "id": "longe-zeiss", "type": "brand", "label": "Zeiss", "children": [
                        { "id": "zeiss-light2", "type": "product", "label": "Light 2" }
                    ]}
                ]}
            ]},
            { "id": "perto", "type": "category", "label": "Perto", "children": [
                { "id": "perto-leitura", "type": "product", "label": "Leitura" }
            ]}
        ]
    }"#;

    #[test]
    fn path_to_is_root_first() {
        let tree = parse_catalog(SAMPLE).expect("valid catalog");
        let path = tree.path_to("zeiss-light2").expect("present");
        let ids: Vec<&str> = path.iter().map(|&i| tree.node(i).id().as_str()).collect();
        assert_eq!(
            ids,
            vec!["root", "longe", "longe-marcas", "longe-zeiss", "zeiss-light2"]
        );
    }

    #[test]
    fn path_to_missing_id_is_none() {
        let tree = parse_catalog(SAMPLE).expect("valid catalog");
        assert!(tree.path_to("nope").is_none());
        assert!(tree.path_to("").is_none());
    }

    #[test]
    fn find_by_kind_walks_in_preorder() {
        let tree = parse_catalog(SAMPLE).expect("valid catalog");
        let products: Vec<&str> = tree
            .find_by_kind(super::NodeKind::Product)
            .into_iter()
            .map(|i| tree.node(i).id().as_str())
            .collect();
        assert_eq!(products, vec!["zeiss-light2", "perto-leitura"]);
    }

    #[test]
    fn child_by_id_only_resolves_direct_children() {
        let tree = parse_catalog(SAMPLE).expect("valid catalog");
        let root = tree.root_index();
        assert!(tree.child_by_id(root, "longe").is_some());
        assert!(tree.child_by_id(root, "longe-marcas").is_none());
    }

    #[test]
    fn nearest_ancestor_of_kind_includes_self() {
        let tree = parse_catalog(SAMPLE).expect("valid catalog");
        let product = tree.find_by_id("zeiss-light2").expect("present");
        let brand = tree
            .nearest_ancestor_of_kind(product, super::NodeKind::Brand)
            .expect("brand above product");
        assert_eq!(tree.node(brand).id().as_str(), "longe-zeiss");
        assert_eq!(
            tree.nearest_ancestor_of_kind(brand, super::NodeKind::Brand),
            Some(brand)
        );
    }
}
