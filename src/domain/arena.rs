use std::fmt;

use generational_arena::{Arena, Index};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::domain::builder::{Diagnostic, TreeBuilder};
use crate::domain::equality::TreeOptions;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node_ref::NodeRef;

/// Arbitrary key-value payload of a node.
pub type NodeData = Map<String, Value>;

/// Stable handle to a node inside a [`TreeArena`].
///
/// Generational: a handle to a pruned node never aliases a later node that
/// reuses the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(Index);

impl NodeId {
    pub(crate) fn index(self) -> Index {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{slot}v{generation}")
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Data payload, children key excluded
    pub data: NodeData,
    /// Parent node, None for roots
    pub parent: Option<NodeId>,
    /// Ordered child nodes
    pub children: Vec<NodeId>,
}

/// Arena holding every node of one or more trees.
///
/// Detached subtrees stay in the arena as standalone trees until pruned.
/// All nodes share one [`TreeOptions`], so the children key and the equality
/// semantics are uniform across the arena.
#[derive(Debug, Clone)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    options: TreeOptions,
    diagnostics: Vec<Diagnostic>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new(TreeOptions::default())
    }
}

impl TreeArena {
    pub fn new(options: TreeOptions) -> Self {
        Self {
            arena: Arena::new(),
            options,
            diagnostics: Vec::new(),
        }
    }

    /// Builds a new arena holding the tree described by `data`.
    ///
    /// Malformed nested children never fail construction; see
    /// [`TreeArena::diagnostics`].
    pub fn from_data(data: &Value, options: TreeOptions) -> (Self, NodeId) {
        let mut tree = Self::new(options);
        let root = tree.insert_data(data);
        (tree, root)
    }

    /// Materializes `data` as a new detached tree inside this arena.
    #[instrument(level = "trace", skip(self, data))]
    pub fn insert_data(&mut self, data: &Value) -> NodeId {
        let children_key = self.options.children_key_name.clone();
        let mut builder = TreeBuilder::new(&children_key);
        let root = builder.build(self, data);
        let diagnostics = builder.into_diagnostics();
        if !diagnostics.is_empty() {
            debug!(count = diagnostics.len(), "construction produced diagnostics");
        }
        self.diagnostics.extend(diagnostics);
        root
    }

    #[instrument(level = "trace", skip(self, data))]
    pub(crate) fn insert_node(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_id = NodeId(self.arena.insert(node));

        if let Some(parent_id) = parent {
            if let Some(parent) = self.arena.get_mut(parent_id.index()) {
                parent.children.push(node_id);
            }
        }

        node_id
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn children_key_name(&self) -> &str {
        &self.options.children_key_name
    }

    /// Non-fatal problems found while building nodes from data.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.arena.get(id.index())
    }

    pub(crate) fn get_node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.arena.get_mut(id.index())
    }

    pub(crate) fn require(&self, id: NodeId) -> TreeResult<&TreeNode> {
        self.get_node(id).ok_or(TreeError::NodeNotFound(id))
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.get_node(id).map(|node| NodeRef::new(self, id, node))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.index())
    }

    /// Number of nodes across all trees in the arena.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// All parentless nodes, in slot order.
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots: Vec<NodeId> = self
            .arena
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(idx, _)| NodeId(idx))
            .collect();
        roots.sort();
        roots
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.get_node(id).map(|n| &n.data)
    }

    /// Mutable access to a node's data.
    ///
    /// Writing the children key here stores a plain value; it does not create
    /// children.
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.get_node_mut(id).map(|n| &mut n.data)
    }

    pub fn get(&self, id: NodeId, key: &str) -> Option<&Value> {
        self.data(id).and_then(|d| d.get(key))
    }

    /// Replaces a node's data, returning the previous payload.
    ///
    /// The children key is stripped; use the structural operations to change
    /// children.
    pub fn set_data(&mut self, id: NodeId, mut data: NodeData) -> TreeResult<NodeData> {
        data.remove(&self.options.children_key_name);
        let node = self.get_node_mut(id).ok_or(TreeError::NodeNotFound(id))?;
        Ok(std::mem::replace(&mut node.data, data))
    }

    /// Height of the subtree rooted at `id`; 1 for a leaf, 0 if absent.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, id: NodeId) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(id, 1)];
        while let Some((current, level)) = stack.pop() {
            if let Some(node) = self.get_node(current) {
                deepest = deepest.max(level);
                stack.extend(node.children.iter().map(|&child| (child, level + 1)));
            }
        }
        deepest
    }

    /// Collects all leaf nodes (nodes with no children) below `id`, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self, id: NodeId) -> Vec<NodeId> {
        self.iter(id)
            .filter(|n| n.child_count() == 0)
            .map(|n| n.id())
            .collect()
    }

    /// Detaches the subtree rooted at `id` and frees all of its slots.
    ///
    /// Returns the data of `id`. Handles into the pruned subtree become stale.
    #[instrument(level = "debug", skip(self))]
    pub fn prune(&mut self, id: NodeId) -> TreeResult<NodeData> {
        self.require(id)?;
        self.detach(id);
        let doomed: Vec<NodeId> = self.iter_postorder(id).map(|n| n.id()).collect();
        let mut data = None;
        for node_id in doomed {
            if let Some(node) = self.arena.remove(node_id.index()) {
                if node_id == id {
                    data = Some(node.data);
                }
            }
        }
        debug!(%id, "pruned subtree");
        data.ok_or(TreeError::NodeNotFound(id))
    }

    /// Pre-order iterator over the subtree at `id`, children left to right.
    pub fn iter(&self, id: NodeId) -> TreeIterator<'_> {
        TreeIterator::new(self, id, false)
    }

    /// Pre-order iterator over the subtree at `id`, children right to left.
    pub fn iter_rev(&self, id: NodeId) -> TreeIterator<'_> {
        TreeIterator::new(self, id, true)
    }

    pub fn iter_postorder(&self, id: NodeId) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, id)
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<NodeId>,
    right_to_left: bool,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena, start: NodeId, right_to_left: bool) -> Self {
        let mut stack = Vec::new();
        if arena.contains(start) {
            stack.push(start);
        }
        Self {
            arena,
            stack,
            right_to_left,
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        while let Some(current) = self.stack.pop() {
            if let Some(node) = arena.get_node(current) {
                // Stack is LIFO: push in the opposite order of the visit
                if self.right_to_left {
                    self.stack.extend(node.children.iter().copied());
                } else {
                    self.stack.extend(node.children.iter().rev().copied());
                }
                return Some(NodeRef::new(arena, current, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena, start: NodeId) -> Self {
        let mut stack = Vec::new();
        if arena.contains(start) {
            stack.push((start, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = arena.get_node(current) {
                if !visited {
                    self.stack.push((current, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some(NodeRef::new(arena, current, node));
                }
            }
        }
        None
    }
}
