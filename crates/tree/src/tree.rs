// Chunk: docs/chunks/tree_model - Immutable syntax trees and mounted inner languages

//! Syntax trees.
//!
//! A [`Tree`] is an immutable node: a [`NodeType`], a length in bytes, and
//! child trees stored together with their start offsets relative to the
//! parent. Trees are cheaply cloneable (`Arc`-shared), so subtrees can be
//! reused across versions of a document.
//!
//! A node may additionally carry a [`MountedTree`]: a tree produced by a
//! different language's parser. Without an overlay the mounted tree stands in
//! for the node's entire subtree; with an overlay only the listed byte ranges
//! (relative to the mounting node) belong to the inner language, and the
//! node's own children cover the rest.

use crate::cursor::TreeCursor;
use crate::node::NodeType;
use std::fmt;
use std::sync::Arc;

/// A byte range of a mounting node that belongs to its inner language.
///
/// Offsets are relative to the mounting node's start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountRange {
    pub from: usize,
    pub to: usize,
}

impl MountRange {
    pub fn new(from: usize, to: usize) -> MountRange {
        MountRange { from, to }
    }
}

/// An inner-language tree mounted on a node.
#[derive(Clone)]
pub struct MountedTree {
    /// The inner tree. Its positions are relative to the mounting node's
    /// start, and for overlay mounts its nodes may span the gaps between
    /// overlay ranges.
    pub tree: Tree,
    /// The ranges of the mounting node covered by the inner language, sorted
    /// by position. `None` means the mount replaces the whole subtree.
    pub overlay: Option<Vec<MountRange>>,
}

impl MountedTree {
    /// A full mount: `tree` replaces the mounting node's subtree.
    pub fn full(tree: Tree) -> MountedTree {
        MountedTree {
            tree,
            overlay: None,
        }
    }

    /// An overlay mount covering only the given ranges.
    pub fn overlay(tree: Tree, ranges: Vec<MountRange>) -> MountedTree {
        MountedTree {
            tree,
            overlay: Some(ranges),
        }
    }
}

struct TreeData {
    node_type: NodeType,
    length: usize,
    children: Vec<Tree>,
    /// Start offset of each child, relative to this node. Ascending.
    positions: Vec<usize>,
    mounted: Option<MountedTree>,
}

/// An immutable syntax tree node.
#[derive(Clone)]
pub struct Tree {
    data: Arc<TreeData>,
}

impl Tree {
    /// Creates a leaf node.
    pub fn leaf(node_type: NodeType, length: usize) -> Tree {
        Tree::new(node_type, length, Vec::new())
    }

    /// Creates a node with children, each given as `(start, child)` where
    /// `start` is relative to this node.
    pub fn new(node_type: NodeType, length: usize, children: Vec<(usize, Tree)>) -> Tree {
        debug_assert!(
            children.windows(2).all(|w| w[0].0 <= w[1].0),
            "children must be position-sorted"
        );
        debug_assert!(
            children.iter().all(|(p, c)| p + c.length() <= length),
            "children must fit inside the node"
        );
        let (positions, children) = children.into_iter().unzip();
        Tree {
            data: Arc::new(TreeData {
                node_type,
                length,
                children,
                positions,
                mounted: None,
            }),
        }
    }

    /// Returns this tree with a mounted inner language attached.
    pub fn with_mount(self, mounted: MountedTree) -> Tree {
        let data = &self.data;
        Tree {
            data: Arc::new(TreeData {
                node_type: data.node_type,
                length: data.length,
                children: data.children.clone(),
                positions: data.positions.clone(),
                mounted: Some(mounted),
            }),
        }
    }

    /// The type of this node.
    pub fn node_type(&self) -> NodeType {
        self.data.node_type
    }

    /// The length of this node in bytes.
    pub fn length(&self) -> usize {
        self.data.length
    }

    /// The child trees, in position order.
    pub fn children(&self) -> &[Tree] {
        &self.data.children
    }

    /// The start offset of child `index`, relative to this node.
    pub fn child_position(&self, index: usize) -> usize {
        self.data.positions[index]
    }

    /// The mounted inner language, if any.
    pub fn mounted(&self) -> Option<&MountedTree> {
        self.data.mounted.as_ref()
    }

    /// A cursor on this tree, with the root starting at offset 0.
    pub fn cursor(&self) -> TreeCursor {
        self.cursor_at(0)
    }

    /// A cursor on this tree, with the root anchored at absolute offset
    /// `base`. Used to walk a mounted tree in host-document coordinates.
    pub fn cursor_at(&self, base: usize) -> TreeCursor {
        TreeCursor::new(self.clone(), base)
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data.node_type.name())?;
        if !self.data.children.is_empty() {
            f.debug_list()
                .entries(self.data.children.iter())
                .finish()?;
        }
        Ok(())
    }
}
