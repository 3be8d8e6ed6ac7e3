//! Equality strategy and construction options shared by all nodes of an arena.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::node_ref::NodeRef;

type EqualityFn = dyn for<'a, 'b> Fn(NodeRef<'a>, NodeRef<'b>) -> bool + Send + Sync;

/// Decides when two nodes count as "the same" for membership and search.
///
/// Stored once per arena, so every node of a tree agrees on the semantics.
#[derive(Clone)]
pub struct NodeEquality {
    label: &'static str,
    eq: Arc<EqualityFn>,
}

impl NodeEquality {
    /// Same arena slot (the default).
    pub fn identity() -> Self {
        Self {
            label: "identity",
            eq: Arc::new(|a: NodeRef<'_>, b: NodeRef<'_>| a.id() == b.id()),
        }
    }

    /// Equal when both nodes carry the same value under `key`.
    ///
    /// Nodes lacking the key fall back to identity, otherwise every keyless
    /// node would be equal to every other keyless node.
    pub fn by_property(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            label: "property",
            eq: Arc::new(move |a: NodeRef<'_>, b: NodeRef<'_>| match (a.get(&key), b.get(&key)) {
                (Some(x), Some(y)) => x == y,
                _ => a.id() == b.id(),
            }),
        }
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: for<'a, 'b> Fn(NodeRef<'a>, NodeRef<'b>) -> bool + Send + Sync + 'static,
    {
        Self {
            label: "custom",
            eq: Arc::new(f),
        }
    }

    pub fn are_equal(&self, a: NodeRef<'_>, b: NodeRef<'_>) -> bool {
        (self.eq)(a, b)
    }
}

impl Default for NodeEquality {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for NodeEquality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeEquality({})", self.label)
    }
}

/// Default data key holding nested children in the serialized form.
pub const DEFAULT_CHILDREN_KEY: &str = "children";

/// Construction options for a tree.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Data key treated as the nested-children array
    pub children_key_name: String,
    /// Equality used by every membership and search operation
    pub equality: NodeEquality,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            children_key_name: DEFAULT_CHILDREN_KEY.to_string(),
            equality: NodeEquality::identity(),
        }
    }
}

impl TreeOptions {
    pub fn with_children_key(mut self, key: impl Into<String>) -> Self {
        self.children_key_name = key.into();
        self
    }

    pub fn with_equality(mut self, equality: NodeEquality) -> Self {
        self.equality = equality;
        self
    }
}

/// Compares a node's property against a plain value.
pub(crate) fn property_matches(node: NodeRef<'_>, key: &str, expected: &Value) -> bool {
    node.get(key).is_some_and(|v| v == expected)
}
