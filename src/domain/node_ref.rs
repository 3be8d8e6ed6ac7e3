use std::fmt;

use serde_json::Value;

use crate::domain::arena::{NodeData, NodeId, TreeArena, TreeNode};

/// Borrowed, read-only view of one live node.
///
/// Only handed out for nodes present in the arena, so accessors never fail.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    arena: &'a TreeArena,
    id: NodeId,
    node: &'a TreeNode,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(arena: &'a TreeArena, id: NodeId, node: &'a TreeNode) -> Self {
        Self { arena, id, node }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn data(&self) -> &'a NodeData {
        &self.node.data
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.node.data.get(key)
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let arena = self.arena;
        self.node.parent.and_then(|p| arena.node(p))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let arena = self.arena;
        let node = self.node;
        node.children.iter().filter_map(move |&c| arena.node(c))
    }

    pub fn child_count(&self) -> usize {
        self.node.children.len()
    }

    pub fn is_root(&self) -> bool {
        self.node.parent.is_none()
    }

    pub fn arena(&self) -> &'a TreeArena {
        self.arena
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("data", &self.node.data)
            .field("children", &self.node.children.len())
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.node.data.clone()))
    }
}
