//! Relationship queries and navigation.
//!
//! Every membership test goes through the arena's [`NodeEquality`], so a tree
//! configured with e.g. property equality answers `has_child`, `index_of_*`
//! and `is_descendant_of` by that property. Handles to absent nodes read as
//! `None`, `false` or empty.
//!
//! [`NodeEquality`]: crate::domain::equality::NodeEquality

use crate::domain::arena::{NodeId, TreeArena};

impl TreeArena {
    pub fn equals(&self, a: NodeId, b: NodeId) -> bool {
        match (self.node(a), self.node(b)) {
            (Some(x), Some(y)) => self.options().equality.are_equal(x, y),
            _ => false,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(|n| n.parent)
    }

    pub fn has_parent(&self, id: NodeId) -> bool {
        self.parent(id).is_some()
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.get_node(id).is_some_and(|n| n.parent.is_none())
    }

    /// True if some proper ancestor of `id` equals `candidate`. O(depth).
    pub fn is_descendant_of(&self, id: NodeId, candidate: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            if self.equals(ancestor, candidate) {
                return true;
            }
            current = self.parent(ancestor);
        }
        false
    }

    pub fn is_ancestor_of(&self, id: NodeId, node: NodeId) -> bool {
        self.is_descendant_of(node, id)
    }

    /// Direct parent test, not transitive.
    pub fn is_parent(&self, id: NodeId, node: NodeId) -> bool {
        self.parent(id).is_some_and(|p| self.equals(p, node))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.get_node(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        !self.children(id).is_empty()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    pub fn has_child(&self, id: NodeId, node: NodeId) -> bool {
        self.index_of_child(id, node).is_some()
    }

    pub fn index_of_child(&self, id: NodeId, node: NodeId) -> Option<usize> {
        self.children(id).iter().position(|&c| self.equals(c, node))
    }

    /// Top of the tree containing `id`. O(depth).
    pub fn root(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.get_node(id).map(|_| id)?;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        Some(current)
    }

    /// The parent's children, or just `[id]` for a root.
    pub fn siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.get_node(id) {
            Some(node) => match node.parent {
                Some(parent) => self.children(parent).to_vec(),
                None => vec![id],
            },
            None => Vec::new(),
        }
    }

    pub fn sibling_count(&self, id: NodeId) -> usize {
        match self.parent(id) {
            Some(parent) => self.children(parent).len(),
            None if self.contains(id) => 1,
            None => 0,
        }
    }

    pub fn is_only_child(&self, id: NodeId) -> bool {
        self.sibling_count(id) == 1
    }

    pub fn first_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.siblings(id).first().copied()
    }

    pub fn last_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.siblings(id).last().copied()
    }

    pub fn left_sibling(&self, id: NodeId) -> Option<NodeId> {
        let index = self.index(id).checked_sub(1)?;
        self.siblings(id).get(index).copied()
    }

    pub fn right_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.siblings(id).get(self.index(id) + 1).copied()
    }

    /// Position among the parent's children; 0 for a root.
    pub fn index(&self, id: NodeId) -> usize {
        self.parent(id)
            .and_then(|parent| self.index_of_child(parent, id))
            .unwrap_or(0)
    }

    pub fn index_of_sibling(&self, id: NodeId, node: NodeId) -> Option<usize> {
        self.siblings(id).iter().position(|&s| self.equals(s, node))
    }

    /// Nodes from the root down to `id`, inclusive.
    pub fn node_path(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// Sibling indices along [`TreeArena::node_path`]; always starts with 0.
    pub fn selection_path(&self, id: NodeId) -> Vec<usize> {
        self.node_path(id)
            .into_iter()
            .map(|node| self.index(node))
            .collect()
    }

    /// Resolves a selection path from the root of `id`'s tree.
    ///
    /// The first step indexes `[root]`, later steps index children. Paths are
    /// not validated against structural changes made since they were taken:
    /// a stale path selects whatever sits at those positions now.
    pub fn select_node(&self, id: NodeId, path: &[usize]) -> Option<NodeId> {
        let root = [self.root(id)?];
        let mut level: &[NodeId] = &root;
        let mut selected = None;
        for &index in path {
            let node = *level.get(index)?;
            selected = Some(node);
            level = self.children(node);
        }
        selected
    }
}
