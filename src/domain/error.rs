//! Domain-level errors (no I/O concerns)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Errors raised by tree operations.
///
/// Lookups never fail: absent nodes and out-of-range indices surface as
/// `None`/`false`. Only mutations and (de)serialization return these.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("root node has no siblings: {0}")]
    RootHasNoSiblings(NodeId),

    #[error("cycle detected: node {0} cannot become its own child")]
    CycleDetected(NodeId),

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("failed to serialize tree: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("failed to parse tree: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(String),

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
