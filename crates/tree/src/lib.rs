// Chunk: docs/chunks/tree_model - Parse-tree data model

//! canopy-tree: the parse-tree data model for the canopy highlighting engine.
//!
//! This crate provides the environment a syntax-directed highlighter runs
//! against: node types with attachable properties, immutable syntax trees,
//! and a cursor for walking them.
//!
//! # Overview
//!
//! The main types are:
//!
//! - [`NodeType`]: an interned node type. Cheap to copy; identity-compared.
//!   Per-type data is attached under [`NodeProp`] keys.
//!
//! - [`NodeSet`]: the types of one language. [`NodeSet::extend`] is the
//!   configuration step that attaches compiled properties (such as a
//!   highlighter's rule tables) to the types.
//!
//! - [`Tree`]: an immutable parse tree. Nodes know their length and their
//!   children's relative positions; a node may carry a [`MountedTree`] when
//!   an inner language is parsed inside it, either replacing the whole
//!   subtree or covering an overlay of byte ranges.
//!
//! - [`TreeCursor`]: a movable position in a tree, tracking the path to the
//!   root and absolute byte offsets.
//!
//! # Example
//!
//! ```
//! use canopy_tree::{NodeSet, NodeType, Tree};
//!
//! let doc = NodeType::define_top("Document");
//! let word = NodeType::define("Word");
//! let _set = NodeSet::new([doc, word]);
//!
//! // "hi hi"
//! let tree = Tree::new(
//!     doc,
//!     5,
//!     vec![(0, Tree::leaf(word, 2)), (3, Tree::leaf(word, 2))],
//! );
//!
//! let mut cursor = tree.cursor();
//! assert!(cursor.first_child());
//! assert!(cursor.next_sibling());
//! assert_eq!((cursor.from(), cursor.to()), (3, 5));
//! ```

mod cursor;
mod node;
mod tree;

pub use cursor::TreeCursor;
pub use node::{NodeProp, NodeSet, NodeType, PropSource};
pub use tree::{MountRange, MountedTree, Tree};
