//! Traversal handle.
//!
//! A [`Spine`] is a node together with the path that led to it from the
//! root. Parents are borrowed, so building a child spine never allocates;
//! the driver keeps the parent spine on its stack while visiting children.
//!
//! `replace` is copy-on-write: it rebuilds every ancestor with the new child
//! substituted and returns the new root. The old tree is untouched.

use crate::{NodeArena, NodeId};

/// Position of a node in a tree.
#[derive(Clone, Copy, Debug)]
pub struct Spine<'a> {
    node: NodeId,
    parent: Option<&'a Spine<'a>>,
    /// Index of `node` among `parent`'s children.
    index: usize,
}

impl<'a> Spine<'a> {
    /// Spine positioned at a tree root.
    pub const fn root(node: NodeId) -> Spine<'static> {
        Spine {
            node,
            parent: None,
            index: 0,
        }
    }

    /// Spine for child `index` of this spine's node.
    pub const fn child(&'a self, node: NodeId, index: usize) -> Spine<'a> {
        Spine {
            node,
            parent: Some(self),
            index,
        }
    }

    /// Same position, holding a different node (after a replacement).
    pub const fn with_node(&self, node: NodeId) -> Spine<'a> {
        Spine {
            node,
            parent: self.parent,
            index: self.index,
        }
    }

    #[inline]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    #[inline]
    pub const fn parent(&self) -> Option<&'a Spine<'a>> {
        self.parent
    }

    /// Index among the parent's children; `None` at the root.
    pub fn index_in_parent(&self) -> Option<usize> {
        self.parent.map(|_| self.index)
    }

    /// Number of ancestors.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cur = self.parent;
        while let Some(p) = cur {
            depth += 1;
            cur = p.parent;
        }
        depth
    }

    /// Root node of the tree this spine points into.
    pub fn root_node(&self) -> NodeId {
        let mut cur = self;
        while let Some(p) = cur.parent {
            cur = p;
        }
        cur.node
    }

    /// Replace this spine's node with `new`, returning the new root.
    pub fn replace(&self, arena: &mut NodeArena, new: NodeId) -> NodeId {
        let mut replacement = new;
        let mut cur = self;
        while let Some(parent) = cur.parent {
            replacement = arena.with_child(parent.node, cur.index, replacement);
            cur = parent;
        }
        replacement
    }
}
