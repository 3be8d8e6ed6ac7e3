//! Domain layer: the arena-backed tree and its operations
//!
//! Independent of external concerns (no I/O, no config loading).

pub mod arena;
pub mod builder;
pub mod display;
pub mod equality;
pub mod error;
mod mutation;
mod navigation;
pub mod node_ref;
mod serialize;
mod traversal;

pub use arena::{NodeData, NodeId, PostOrderIterator, TreeArena, TreeIterator, TreeNode};
pub use builder::{Diagnostic, DiagnosticKind, TreeBuilder};
pub use display::TreeDisplay;
pub use equality::{NodeEquality, TreeOptions, DEFAULT_CHILDREN_KEY};
pub use error::{TreeError, TreeResult};
pub use node_ref::NodeRef;
