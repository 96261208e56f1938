// Chunk: docs/chunks/tree_cursor - Stack-based tree cursor

//! Tree cursors.
//!
//! A [`TreeCursor`] is a movable position inside a tree. It keeps the path
//! from the root to the current node, so `parent()` is O(1) and the absolute
//! byte range of the current node is always available.
//!
//! Movement methods return `false` and leave the cursor in place when there
//! is nowhere to go, which makes the usual walk read as
//! `if cursor.first_child() { loop { ...; if !cursor.next_sibling() { break } } cursor.parent(); }`.

use crate::node::NodeType;
use crate::tree::Tree;

#[derive(Clone)]
struct Frame {
    tree: Tree,
    /// Absolute start offset of `tree`.
    start: usize,
    /// Index of `tree` among its parent's children (0 for the root).
    child_index: usize,
}

/// A movable position in a [`Tree`].
#[derive(Clone)]
pub struct TreeCursor {
    frames: Vec<Frame>,
}

impl TreeCursor {
    pub(crate) fn new(tree: Tree, base: usize) -> TreeCursor {
        TreeCursor {
            frames: vec![Frame {
                tree,
                start: base,
                child_index: 0,
            }],
        }
    }

    fn current(&self) -> &Frame {
        self.frames.last().expect("cursor always has a frame")
    }

    /// Absolute start offset of the current node.
    pub fn from(&self) -> usize {
        self.current().start
    }

    /// Absolute end offset of the current node.
    pub fn to(&self) -> usize {
        let frame = self.current();
        frame.start + frame.tree.length()
    }

    /// The type of the current node.
    pub fn node_type(&self) -> NodeType {
        self.current().tree.node_type()
    }

    /// The current node's tree.
    pub fn tree(&self) -> &Tree {
        &self.current().tree
    }

    /// The depth of the current node (0 at the root).
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    /// The type of the `levels_up`-th ancestor (1 = direct parent).
    pub fn ancestor_type(&self, levels_up: usize) -> Option<NodeType> {
        let depth = self.frames.len() - 1;
        if levels_up == 0 || levels_up > depth {
            return None;
        }
        Some(self.frames[depth - levels_up].tree.node_type())
    }

    /// Moves to the first child. Returns `false` on a leaf.
    pub fn first_child(&mut self) -> bool {
        let frame = self.current();
        if frame.tree.children().is_empty() {
            return false;
        }
        let child = frame.tree.children()[0].clone();
        let start = frame.start + frame.tree.child_position(0);
        self.frames.push(Frame {
            tree: child,
            start,
            child_index: 0,
        });
        true
    }

    /// Moves to the next sibling. Returns `false` on the last child or the
    /// root.
    pub fn next_sibling(&mut self) -> bool {
        if self.frames.len() < 2 {
            return false;
        }
        let parent = &self.frames[self.frames.len() - 2];
        let next_index = self.current().child_index + 1;
        if next_index >= parent.tree.children().len() {
            return false;
        }
        let tree = parent.tree.children()[next_index].clone();
        let start = parent.start + parent.tree.child_position(next_index);
        *self.frames.last_mut().unwrap() = Frame {
            tree,
            start,
            child_index: next_index,
        };
        true
    }

    /// Moves to the parent. Returns `false` at the root.
    pub fn parent(&mut self) -> bool {
        if self.frames.len() < 2 {
            return false;
        }
        self.frames.pop();
        true
    }
}
