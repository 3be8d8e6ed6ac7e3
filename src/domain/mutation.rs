//! Structural mutation.
//!
//! Each operation updates `children` and `parent` links within one `&mut self`
//! call, so the parent/child invariant holds again before control returns.

use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{NodeId, TreeArena};
use crate::domain::error::{TreeError, TreeResult};

impl TreeArena {
    /// Unlinks `id` from its parent by identity. Returns whether it had one.
    pub(crate) fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if let Some(parent_node) = self.get_node_mut(parent) {
            parent_node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.get_node_mut(id) {
            node.parent = None;
        }
        trace!(%id, %parent, "detached");
        true
    }

    /// Attaches `node` as a child of `parent` at `index` (clamped), or last.
    ///
    /// `node` is first detached from its current parent. If `node` is an
    /// ancestor of `parent`, `parent` is detached from its own parent first so
    /// no cycle forms; with `allow_circular_references` that step is skipped
    /// and the caller owns any cycle introduced.
    #[instrument(level = "trace", skip(self))]
    pub fn add_child_node(
        &mut self,
        parent: NodeId,
        node: NodeId,
        index: Option<usize>,
        allow_circular_references: bool,
    ) -> TreeResult<()> {
        self.require(parent)?;
        self.require(node)?;

        if !allow_circular_references {
            if parent == node {
                return Err(TreeError::CycleDetected(node));
            }
            // identity ancestry too: custom predicates need not be reflexive
            if self.is_descendant_of(parent, node) || self.node_path(parent).contains(&node) {
                debug!(%parent, %node, "attaching an ancestor, detaching parent first");
                self.detach(parent);
            }
        }

        self.detach(node);

        let siblings = &mut self
            .get_node_mut(parent)
            .ok_or(TreeError::NodeNotFound(parent))?
            .children;
        let len = siblings.len();
        let at = index.map_or(len, |i| i.min(len));
        siblings.insert(at, node);

        if let Some(child) = self.get_node_mut(node) {
            child.parent = Some(parent);
        }
        trace!(%parent, %node, at, "attached");
        Ok(())
    }

    /// Builds a node from `data` and attaches it under `parent`.
    pub fn add_child_data(
        &mut self,
        parent: NodeId,
        data: &Value,
        index: Option<usize>,
    ) -> TreeResult<NodeId> {
        self.require(parent)?;
        let child = self.insert_data(data);
        self.add_child_node(parent, child, index, false)?;
        Ok(child)
    }

    /// Removes the first child of `parent` equal to `node`.
    pub fn remove_child(&mut self, parent: NodeId, node: NodeId) -> bool {
        match self.index_of_child(parent, node) {
            Some(pos) => {
                let child = self.children(parent)[pos];
                self.detach(child)
            }
            None => false,
        }
    }

    /// Detaches `id` from its parent; false if it already was a root.
    pub fn remove_parent(&mut self, id: NodeId) -> bool {
        self.detach(id)
    }

    /// Appends `id` under `parent`, or detaches it when `parent` is `None`.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> TreeResult<()> {
        match parent {
            Some(parent) => self.add_child_node(parent, id, None, false),
            None => {
                self.require(id)?;
                self.remove_parent(id);
                Ok(())
            }
        }
    }

    /// Inserts `node` into the children of `id`'s parent.
    ///
    /// Roots have no sibling list, so this fails for a root. Unlike a raw
    /// splice, `node` goes through the same detach-then-attach path as
    /// [`TreeArena::add_child_node`], so it never keeps a stale parent link.
    #[instrument(level = "trace", skip(self))]
    pub fn add_sibling_node(
        &mut self,
        id: NodeId,
        node: NodeId,
        index: Option<usize>,
    ) -> TreeResult<()> {
        let parent = self.sibling_parent(id)?;
        self.add_child_node(parent, node, index, false)
    }

    /// Builds a node from `data` and inserts it as a sibling of `id`.
    ///
    /// The root check runs before anything is built, so a failure leaves the
    /// arena untouched.
    pub fn add_sibling_data(
        &mut self,
        id: NodeId,
        data: &Value,
        index: Option<usize>,
    ) -> TreeResult<NodeId> {
        let parent = self.sibling_parent(id)?;
        let sibling = self.insert_data(data);
        self.add_child_node(parent, sibling, index, false)?;
        Ok(sibling)
    }

    fn sibling_parent(&self, id: NodeId) -> TreeResult<NodeId> {
        self.require(id)?
            .parent
            .ok_or(TreeError::RootHasNoSiblings(id))
    }

    /// Deep-copies a subtree of `other` into this arena as a detached root.
    ///
    /// The copy adopts this arena's options.
    #[instrument(level = "debug", skip(self, other))]
    pub fn import_subtree(&mut self, other: &TreeArena, other_id: NodeId) -> TreeResult<NodeId> {
        other.require(other_id)?;
        let mut root = None;
        let mut stack = vec![(other_id, None)];

        while let Some((source, parent)) = stack.pop() {
            let Some(node) = other.get_node(source) else {
                continue;
            };
            let id = self.insert_node(node.data.clone(), parent);
            root.get_or_insert(id);
            for &child in node.children.iter().rev() {
                stack.push((child, Some(id)));
            }
        }

        root.ok_or(TreeError::NodeNotFound(other_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{TreeArena, TreeError, TreeOptions};
    use serde_json::json;

    #[test]
    fn add_child_node_to_itself_is_rejected() {
        let (mut tree, root) = TreeArena::from_data(&json!({}), TreeOptions::default());
        let result = tree.add_child_node(root, root, None, false);
        assert!(matches!(result, Err(TreeError::CycleDetected(id)) if id == root));
        assert!(tree.is_root(root));
    }

    #[test]
    fn index_is_clamped_to_child_count() {
        let (mut tree, root) =
            TreeArena::from_data(&json!({"children": [{}, {}]}), TreeOptions::default());
        let added = tree.add_child_data(root, &json!({"n": 9}), Some(99)).unwrap();
        assert_eq!(tree.last_child(root), Some(added));
    }

    #[test]
    fn set_parent_none_detaches() {
        let (mut tree, root) =
            TreeArena::from_data(&json!({"children": [{}]}), TreeOptions::default());
        let child = tree.first_child(root).unwrap();

        tree.set_parent(child, None).unwrap();

        assert!(tree.is_root(child));
        assert!(!tree.has_children(root));
    }
}
