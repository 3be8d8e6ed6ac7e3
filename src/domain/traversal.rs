//! Depth-first traversal and predicate search.
//!
//! All walks are pre-order: a node is visited before its children, children
//! left to right unless `right_to_left` is set.

use serde_json::Value;

use crate::domain::arena::{NodeId, TreeArena, TreeIterator};
use crate::domain::equality::property_matches;
use crate::domain::node_ref::NodeRef;

impl TreeArena {
    fn traverse(&self, id: NodeId, right_to_left: bool) -> TreeIterator<'_> {
        if right_to_left {
            self.iter_rev(id)
        } else {
            self.iter(id)
        }
    }

    /// Visits the subtree at `id` until `visitor` returns `true`.
    ///
    /// An abort stops the entire walk, not just the current branch. Returns
    /// whether the walk was aborted.
    pub fn walk<F>(&self, id: NodeId, mut visitor: F, right_to_left: bool) -> bool
    where
        F: FnMut(NodeRef<'_>) -> bool,
    {
        self.traverse(id, right_to_left).any(|node| visitor(node))
    }

    pub fn find_first<P>(
        &self,
        id: NodeId,
        mut predicate: P,
        right_to_left: bool,
    ) -> Option<NodeId>
    where
        P: FnMut(NodeRef<'_>) -> bool,
    {
        self.traverse(id, right_to_left)
            .find(|node| predicate(*node))
            .map(|node| node.id())
    }

    pub fn find_all<P>(&self, id: NodeId, mut predicate: P, right_to_left: bool) -> Vec<NodeId>
    where
        P: FnMut(NodeRef<'_>) -> bool,
    {
        self.traverse(id, right_to_left)
            .filter(|node| predicate(*node))
            .map(|node| node.id())
            .collect()
    }

    /// First node whose `id_property_name` value equals `value`.
    pub fn find_by_id(
        &self,
        id: NodeId,
        value: &Value,
        id_property_name: &str,
        right_to_left: bool,
    ) -> Option<NodeId> {
        self.find_first(
            id,
            |node| property_matches(node, id_property_name, value),
            right_to_left,
        )
    }
}
