//! In-memory view hierarchy

use std::collections::HashMap;

use super::host::ViewTree;
use super::types::{Insets, NodeId};

#[derive(Debug, Clone)]
struct ViewNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    auto_constraints: bool,
    safe_area_insets: Insets,
}

impl ViewNode {
    fn new(safe_area_insets: Insets) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            auto_constraints: true,
            safe_area_insets,
        }
    }
}

/// A tree of view nodes keyed by id
///
/// Nodes are created on first use and keep their insertion order.
#[derive(Debug, Clone, Default)]
pub struct ViewHierarchy {
    nodes: HashMap<NodeId, ViewNode>,
    order: Vec<NodeId>,
    default_insets: Insets,
}

impl ViewHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hierarchy whose new nodes start with the given safe-area insets
    pub fn with_default_insets(insets: Insets) -> Self {
        Self {
            default_insets: insets,
            ..Self::default()
        }
    }

    /// Register a node. Returns false if it already existed.
    pub fn insert(&mut self, id: &NodeId) -> bool {
        if self.nodes.contains_key(id) {
            return false;
        }
        self.nodes
            .insert(id.clone(), ViewNode::new(self.default_insets));
        self.order.push(id.clone());
        true
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// All node ids in insertion order
    pub fn ids(&self) -> &[NodeId] {
        &self.order
    }

    pub fn parent(&self, id: &NodeId) -> Option<&NodeId> {
        self.nodes.get(id).and_then(|n| n.parent.as_ref())
    }

    pub fn children(&self, id: &NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Nodes without a parent, in insertion order
    pub fn roots(&self) -> impl Iterator<Item = &NodeId> {
        self.order.iter().filter(|id| self.parent(id).is_none())
    }

    /// True until the node is marked as manually positioned
    pub fn translates_auto_constraints(&self, id: &NodeId) -> bool {
        self.nodes.get(id).map(|n| n.auto_constraints).unwrap_or(true)
    }

    pub fn safe_area_insets(&self, id: &NodeId) -> Insets {
        self.nodes
            .get(id)
            .map(|n| n.safe_area_insets)
            .unwrap_or(self.default_insets)
    }

    pub fn set_safe_area_insets(&mut self, id: &NodeId, insets: Insets) {
        self.insert(id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.safe_area_insets = insets;
        }
    }

    /// Whether `node` is `ancestor` or lies somewhere below it
    pub fn is_descendant_of(&self, node: &NodeId, ancestor: &NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Detach `id` from its parent, if any
    pub fn remove_from_parent(&mut self, id: &NodeId) {
        let Some(parent) = self.nodes.get_mut(id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.retain(|child| child != id);
        }
    }
}

impl ViewTree for ViewHierarchy {
    fn attach(&mut self, node: &NodeId, parent: &NodeId) {
        self.insert(node);
        self.insert(parent);

        if self.is_descendant_of(parent, node) {
            tracing::warn!(
                node = %node,
                parent = %parent,
                "refusing to attach a view inside itself"
            );
            return;
        }

        self.remove_from_parent(node);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(node.clone());
        }
        if let Some(child) = self.nodes.get_mut(node) {
            child.parent = Some(parent.clone());
        }
        tracing::trace!(node = %node, parent = %parent, "attached view");
    }

    fn disable_auto_constraints(&mut self, node: &NodeId) {
        self.insert(node);
        if let Some(view) = self.nodes.get_mut(node) {
            view.auto_constraints = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> NodeId {
        NodeId::new(name)
    }

    #[test]
    fn test_attach_creates_nodes() {
        let mut tree = ViewHierarchy::new();
        tree.attach(&id("child"), &id("root"));

        assert!(tree.contains(&id("child")));
        assert_eq!(tree.parent(&id("child")), Some(&id("root")));
        assert_eq!(tree.children(&id("root")), &[id("child")]);
        assert_eq!(tree.roots().collect::<Vec<_>>(), vec![&id("root")]);
    }

    #[test]
    fn test_reattach_moves_node() {
        let mut tree = ViewHierarchy::new();
        tree.attach(&id("child"), &id("a"));
        tree.attach(&id("child"), &id("b"));

        assert!(tree.children(&id("a")).is_empty());
        assert_eq!(tree.children(&id("b")), &[id("child")]);
        assert_eq!(tree.parent(&id("child")), Some(&id("b")));
    }

    #[test]
    fn test_reattach_to_same_parent_does_not_duplicate() {
        let mut tree = ViewHierarchy::new();
        tree.attach(&id("child"), &id("root"));
        tree.attach(&id("child"), &id("root"));
        assert_eq!(tree.children(&id("root")).len(), 1);
    }

    #[test]
    fn test_attach_into_descendant_is_refused() {
        let mut tree = ViewHierarchy::new();
        tree.attach(&id("child"), &id("root"));
        tree.attach(&id("root"), &id("child"));
        tree.attach(&id("root"), &id("root"));

        assert_eq!(tree.parent(&id("root")), None);
        assert_eq!(tree.parent(&id("child")), Some(&id("root")));
    }

    #[test]
    fn test_auto_constraints_flag() {
        let mut tree = ViewHierarchy::new();
        tree.insert(&id("a"));
        assert!(tree.translates_auto_constraints(&id("a")));
        tree.disable_auto_constraints(&id("a"));
        tree.disable_auto_constraints(&id("a"));
        assert!(!tree.translates_auto_constraints(&id("a")));
    }

    #[test]
    fn test_default_insets() {
        let insets = Insets::new(20.0, 10.0, 0.0, 0.0);
        let mut tree = ViewHierarchy::with_default_insets(insets);
        tree.insert(&id("a"));
        assert_eq!(tree.safe_area_insets(&id("a")), insets);

        tree.set_safe_area_insets(&id("a"), Insets::zero());
        assert_eq!(tree.safe_area_insets(&id("a")), Insets::zero());
    }

    #[test]
    fn test_insertion_order() {
        let mut tree = ViewHierarchy::new();
        assert!(tree.insert(&id("b")));
        assert!(tree.insert(&id("a")));
        assert!(!tree.insert(&id("b")));
        assert_eq!(tree.ids(), &[id("b"), id("a")]);
    }
}
