//! Conversion to and from the plain JSON representation.
//!
//! Shape: `{ <data keys>: <values>, "<children key>": [ <child objects> ] }`.
//! Parent links are never written, so the output is always acyclic.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::domain::arena::{NodeId, TreeArena};
use crate::domain::builder::json_type_name;
use crate::domain::equality::TreeOptions;
use crate::domain::error::{TreeError, TreeResult};

impl TreeArena {
    /// Plain object for the subtree at `id`.
    ///
    /// Assembled bottom-up from a post-order walk, so depth is bounded by the
    /// heap rather than the call stack.
    pub fn to_object(&self, id: NodeId) -> TreeResult<Value> {
        self.require(id)?;
        let key = self.children_key_name();
        let mut finished: HashMap<NodeId, Value> = HashMap::new();

        for node in self.iter_postorder(id) {
            let children = self
                .children(node.id())
                .iter()
                .filter_map(|child| finished.remove(child))
                .collect();
            let mut object = node.data().clone();
            object.insert(key.to_string(), Value::Array(children));
            finished.insert(node.id(), Value::Object(object));
        }

        finished.remove(&id).ok_or(TreeError::NodeNotFound(id))
    }

    pub fn to_json(&self, id: NodeId) -> TreeResult<String> {
        serde_json::to_string(&self.to_object(id)?).map_err(TreeError::Serialization)
    }

    pub fn to_json_pretty(&self, id: NodeId) -> TreeResult<String> {
        serde_json::to_string_pretty(&self.to_object(id)?).map_err(TreeError::Serialization)
    }

    /// Parses `text` into a new arena.
    pub fn from_json(text: &str, options: TreeOptions) -> TreeResult<(Self, NodeId)> {
        let value = parse_object(text)?;
        Ok(Self::from_data(&value, options))
    }

    /// Parses `text` into a new detached tree inside this arena.
    pub fn insert_json(&mut self, text: &str) -> TreeResult<NodeId> {
        let value = parse_object(text)?;
        Ok(self.insert_data(&value))
    }

    /// Deep copy of the subtree at `id` as a new detached root.
    ///
    /// Rebuilt from the plain-object form, so the copy shares no state with
    /// the original and the parent link is not carried over.
    #[instrument(level = "debug", skip(self))]
    pub fn clone_subtree(&mut self, id: NodeId) -> TreeResult<NodeId> {
        let object = self.to_object(id)?;
        Ok(self.insert_data(&object))
    }
}

/// Each tree level nests two JSON levels (object and children array), so
/// serde_json's recursion limit is lifted and the stack grows on demand.
fn parse_object(text: &str) -> TreeResult<Value> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))
        .map_err(TreeError::Parse)?;
    deserializer.end().map_err(TreeError::Parse)?;
    if !value.is_object() {
        return Err(TreeError::NotAnObject(json_type_name(&value).to_string()));
    }
    Ok(value)
}
