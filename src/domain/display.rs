use std::collections::HashMap;

use serde_json::Value;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{NodeId, TreeArena};

/// Renders a subtree as a `termtree` for terminal display.
pub trait TreeDisplay {
    /// Labels each node by `label_key`, falling back to the node's data as
    /// compact JSON when the key is missing.
    fn to_tree_string(&self, id: NodeId, label_key: &str) -> Tree<String>;
}

impl TreeDisplay for TreeArena {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, id: NodeId, label_key: &str) -> Tree<String> {
        if !self.contains(id) {
            return Tree::new("Empty tree".to_string());
        }

        // Post-order, so every child is rendered before its parent collects it
        let mut rendered: HashMap<NodeId, Tree<String>> = HashMap::new();
        for node in self.iter_postorder(id) {
            let leaves: Vec<_> = self
                .children(node.id())
                .iter()
                .filter_map(|child| rendered.remove(child))
                .collect();
            let tree = Tree::new(label(self, node.id(), label_key)).with_leaves(leaves);
            rendered.insert(node.id(), tree);
        }

        rendered
            .remove(&id)
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

fn label(arena: &TreeArena, id: NodeId, label_key: &str) -> String {
    match arena.get(id, label_key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => arena
            .data(id)
            .map(|d| Value::Object(d.clone()).to_string())
            .unwrap_or_default(),
    }
}
