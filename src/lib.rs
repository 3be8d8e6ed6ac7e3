//! Mutable in-memory n-ary trees.
//!
//! Nodes carry a JSON object of arbitrary data plus ordered children and live
//! in a [`TreeArena`], addressed by [`NodeId`] handles. The arena offers
//! navigation, structural mutation, predicate search, selection paths, and
//! lossless conversion to and from the plain JSON form
//! `{ ..data, "children": [ ... ] }`.
//!
//! ```
//! use nodetree::{TreeArena, TreeOptions};
//! use serde_json::json;
//!
//! let (mut tree, root) = TreeArena::from_data(
//!     &json!({"id": 1, "children": [{"id": 2}, {"id": 3}]}),
//!     TreeOptions::default(),
//! );
//! let added = tree.add_child_data(root, &json!({"id": 4}), Some(0)).unwrap();
//!
//! assert_eq!(tree.index(added), 0);
//! assert_eq!(tree.select_node(root, &tree.selection_path(added)), Some(added));
//! ```

pub mod config;
pub mod domain;
pub mod util;

pub use domain::{
    Diagnostic, DiagnosticKind, NodeData, NodeEquality, NodeId, NodeRef, TreeArena, TreeDisplay,
    TreeError, TreeOptions, TreeResult,
};

/// A node used as the top of a tree is addressed the same way as any other.
pub type Tree = TreeArena;
