//! Tree builder for materializing nested data into arena nodes.

use std::fmt;

use serde_json::Value;
use tracing::{instrument, warn};

use crate::domain::arena::{NodeData, NodeId, TreeArena};

/// Non-fatal problem found while building nodes from loosely-typed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Node that was built despite the problem
    pub node: NodeId,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The children key held something other than an array; it was dropped.
    ChildrenNotAnArray { key: String, found: &'static str },
    /// A node description was not an object; the node got empty data.
    NotAnObject {
        found: &'static str,
        position: Option<usize>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::ChildrenNotAnArray { key, found } => write!(
                f,
                "node {}: '{key}' must be an array, found {found}; children dropped",
                self.node
            ),
            DiagnosticKind::NotAnObject {
                found,
                position: Some(pos),
            } => write!(
                f,
                "node {}: child at position {pos} must be an object, found {found}; data dropped",
                self.node
            ),
            DiagnosticKind::NotAnObject {
                found,
                position: None,
            } => write!(
                f,
                "node {}: expected an object, found {found}; data dropped",
                self.node
            ),
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Constructs arena nodes from nested data.
///
/// Iterative (explicit stack), so deeply nested input cannot overflow the
/// call stack.
pub struct TreeBuilder<'k> {
    children_key: &'k str,
    diagnostics: Vec<Diagnostic>,
}

type Pending<'v> = (&'v Value, NodeId, usize);

impl<'k> TreeBuilder<'k> {
    pub fn new(children_key: &'k str) -> Self {
        Self {
            children_key,
            diagnostics: Vec::new(),
        }
    }

    /// Builds `data` as a detached tree in `tree`, returning its root.
    #[instrument(level = "trace", skip_all)]
    pub fn build(&mut self, tree: &mut TreeArena, data: &Value) -> NodeId {
        let mut stack: Vec<Pending<'_>> = Vec::new();
        let root = self.materialize(tree, data, None, None, &mut stack);

        while let Some((value, parent, position)) = stack.pop() {
            self.materialize(tree, value, Some(parent), Some(position), &mut stack);
        }

        root
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn materialize<'v>(
        &mut self,
        tree: &mut TreeArena,
        value: &'v Value,
        parent: Option<NodeId>,
        position: Option<usize>,
        stack: &mut Vec<Pending<'v>>,
    ) -> NodeId {
        let (data, nested) = match value {
            Value::Object(map) => {
                let data: NodeData = map
                    .iter()
                    .filter(|(k, _)| k.as_str() != self.children_key)
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                (data, map.get(self.children_key))
            }
            _ => (NodeData::new(), None),
        };

        let id = tree.insert_node(data, parent);

        if !value.is_object() {
            self.report(Diagnostic {
                node: id,
                kind: DiagnosticKind::NotAnObject {
                    found: json_type_name(value),
                    position,
                },
            });
        }

        match nested {
            Some(Value::Array(children)) => {
                // Reverse push keeps insertion order equal to array order
                for (pos, child) in children.iter().enumerate().rev() {
                    stack.push((child, id, pos));
                }
            }
            None | Some(Value::Null) => {}
            Some(other) => self.report(Diagnostic {
                node: id,
                kind: DiagnosticKind::ChildrenNotAnArray {
                    key: self.children_key.to_string(),
                    found: json_type_name(other),
                },
            }),
        }

        id
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}
