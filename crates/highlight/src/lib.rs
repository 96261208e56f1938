// Chunk: docs/chunks/highlight_traversal - Syntax-directed highlighting engine

//! canopy-highlight: syntax-directed highlighting over canopy parse trees.
//!
//! This crate maps nodes of a parsed source tree to style classes. A
//! language attaches compiled selector rules to its node types once, at
//! configuration time; at highlight time the engine walks a tree over a byte
//! range and emits non-overlapping `(from, to, classes)` spans for every
//! styled stretch of text.
//!
//! # Overview
//!
//! The main pieces are:
//!
//! - [`Tag`] / [`Modifier`]: the tag algebra. Tags name highlighting
//!   categories and carry a precomputed fallback chain; modifiers add
//!   orthogonal attributes with canonical (idempotent, commutative)
//!   interning. [`tags()`] exposes the standard vocabulary.
//!
//! - [`style_tags`]: compiles a selector table (`"Key/Identifier"`,
//!   `"Array!"`, `"Tag/..."`, quoted names, `*` wildcards) into per-node
//!   [`Rule`] chains, attached to node types via
//!   [`NodeSet::extend`](canopy_tree::NodeSet::extend).
//!
//! - [`HighlightStyle`]: maps tags to class strings, with scope restriction,
//!   an optional `all` class, and memoized fallback resolution.
//!   [`HighlightStyle::combined_match`] merges several styles.
//!   [`class_highlighter()`] is the `cmt-` class preset.
//!
//! - [`highlight_tree`]: the traversal. Handles inherited and opaque rules,
//!   ancestor-context matching, and mounted inner languages (full and
//!   overlay). [`highlight_code`] layers line-break splitting on top.
//!
//! # Example
//!
//! ```
//! use canopy_highlight::{class_highlighter, highlight_tree, style_tags, tags};
//! use canopy_tree::{NodeSet, NodeType, Tree};
//!
//! // A one-rule language: `Word` nodes are keywords.
//! let set = NodeSet::new([NodeType::define_top("Doc"), NodeType::define("Word")]);
//! let set = set
//!     .extend(&[style_tags(&[("Word", &[tags().keyword])]).unwrap()]);
//! let doc = set.type_named("Doc").unwrap();
//! let word = set.type_named("Word").unwrap();
//!
//! // "hi hi"
//! let tree = Tree::new(
//!     doc,
//!     5,
//!     vec![(0, Tree::leaf(word, 2)), (3, Tree::leaf(word, 2))],
//! );
//!
//! let mut spans = Vec::new();
//! highlight_tree(&tree, class_highlighter(), .., |from, to, classes| {
//!     spans.push((from, to, classes.to_string()));
//! });
//! assert_eq!(
//!     spans,
//!     vec![
//!         (0, 2, "cmt-keyword".to_string()),
//!         (3, 5, "cmt-keyword".to_string()),
//!     ]
//! );
//! ```

mod highlighter;
mod selector;
mod style;
mod tag;
mod vocab;

pub use highlighter::{highlight_code, highlight_tree};
pub use selector::{get_style_tags, style_tags, Mode, PathError, Rule};
pub use style::{CombinedMatcher, HighlightStyle, StyleMatcher, StyleOptions, StyleSpec};
pub use tag::{Modifier, Tag, TagError};
pub use vocab::{class_highlighter, tags, Tags};
