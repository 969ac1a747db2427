//! Node arena.
//!
//! [`NodeArena`] uses struct-of-arrays layout (parallel `kinds`, `spans`,
//! `types` arrays indexed by [`NodeId`]). Nodes are append-only: a rewrite
//! never edits a node, it pushes a new one and hands back the new id. That
//! makes `NodeId` equality the identity relation the stringify cache keys on.
//!
//! # Index Spaces
//!
//! - `kinds`/`spans`/`types`: parallel arrays indexed by [`NodeId`]
//! - `lists`: flat `Vec<NodeId>` indexed by [`NodeRange`]

use std::cell::RefCell;

use smallvec::SmallVec;

use crate::stringify::StringifyCache;
use crate::{Name, Node, NodeId, NodeKind, NodeRange, Span, StringInterner, Type};

/// Children of a node in their fixed traversal order.
pub type Children = SmallVec<[NodeId; 4]>;

/// Arena owning every node of every tree produced during a compilation.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    /// Node kinds (parallel with spans and types).
    kinds: Vec<NodeKind>,
    /// Source locations (parallel with kinds).
    spans: Vec<Span>,
    /// Target types from the type pass (parallel with kinds).
    types: Vec<Option<Type>>,
    /// Flattened child lists (op args, call args, collection elements).
    lists: Vec<NodeId>,
    /// Identifier, builtin and operator-symbol strings.
    interner: StringInterner,
    /// Memoized canonical strings, keyed by `(NodeId, skip_target_type)`.
    pub(crate) stringified: RefCell<StringifyCache>,
}

impl NodeArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node, returning its ID.
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(to_u32(self.kinds.len(), "nodes"));
        self.kinds.push(node.kind);
        self.spans.push(node.span);
        self.types.push(node.ty);
        id
    }

    /// Allocate a node with no span and no type.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.push(Node::synthetic(kind))
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.kinds[id.index()]
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.spans[id.index()]
    }

    #[inline]
    pub fn ty(&self, id: NodeId) -> Option<&Type> {
        self.types[id.index()].as_ref()
    }

    /// Reconstruct a full `Node` from the parallel arrays.
    pub fn get(&self, id: NodeId) -> Node {
        Node {
            kind: self.kinds[id.index()].clone(),
            span: self.spans[id.index()],
            ty: self.types[id.index()].clone(),
        }
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Allocate a contiguous range of node IDs.
    pub fn push_list(&mut self, ids: &[NodeId]) -> NodeRange {
        if ids.is_empty() {
            return NodeRange::EMPTY;
        }
        let start = to_u32(self.lists.len(), "node lists");
        self.lists.extend_from_slice(ids);
        NodeRange::new(start, to_u16(ids.len(), "node list"))
    }

    /// Get node IDs from a range.
    pub fn list(&self, range: NodeRange) -> &[NodeId] {
        if range.is_empty() {
            return &[];
        }
        let start = range.start as usize;
        &self.lists[start..start + range.len()]
    }

    pub fn intern(&mut self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Resolve an interned name.
    pub fn name(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Children of `id` in fixed order.
    pub fn children(&self, id: NodeId) -> Children {
        let mut out = Children::new();
        match *self.kind(id) {
            NodeKind::Identifier(_)
            | NodeKind::Integer(_)
            | NodeKind::Text(_)
            | NodeKind::Builtin(_) => {}
            NodeKind::Op { args: list, .. }
            | NodeKind::Block(list)
            | NodeKind::Array(list)
            | NodeKind::List(list) => out.extend_from_slice(self.list(list)),
            NodeKind::Assignment { variable, expr } => out.extend([variable, expr]),
            NodeKind::MutatingInfix {
                variable, right, ..
            } => out.extend([variable, right]),
            NodeKind::Infix { left, right, .. } => out.extend([left, right]),
            NodeKind::Prefix { arg, .. }
            | NodeKind::Postfix { arg, .. }
            | NodeKind::ImplicitConversion(arg)
            | NodeKind::PropertyCall { object: arg, .. } => out.push(arg),
            NodeKind::IndexCall { collection, index } => out.extend([collection, index]),
            NodeKind::FunctionCall { func: head, args }
            | NodeKind::MethodCall {
                object: head, args, ..
            } => {
                out.push(head);
                out.extend_from_slice(self.list(args));
            }
        }
        out
    }

    /// Allocate a copy of `id` with its children replaced.
    ///
    /// Span and type are carried over. Leaves are returned unchanged.
    ///
    /// # Panics
    /// Panics if `children.len()` differs from the node's child count.
    pub fn with_children(&mut self, id: NodeId, children: &[NodeId]) -> NodeId {
        let old = self.children(id);
        assert_eq!(
            old.len(),
            children.len(),
            "{} node {id:?} has {} children, got {} replacements",
            self.kind(id).tag(),
            old.len(),
            children.len(),
        );
        if old.as_slice() == children {
            return id;
        }
        let kind = match self.kind(id).clone() {
            NodeKind::Identifier(_)
            | NodeKind::Integer(_)
            | NodeKind::Text(_)
            | NodeKind::Builtin(_) => return id,
            NodeKind::Op { op, .. } => NodeKind::Op {
                op,
                args: self.push_list(children),
            },
            NodeKind::Block(_) => NodeKind::Block(self.push_list(children)),
            NodeKind::Array(_) => NodeKind::Array(self.push_list(children)),
            NodeKind::List(_) => NodeKind::List(self.push_list(children)),
            NodeKind::Assignment { .. } => NodeKind::Assignment {
                variable: children[0],
                expr: children[1],
            },
            NodeKind::MutatingInfix { name, .. } => NodeKind::MutatingInfix {
                name,
                variable: children[0],
                right: children[1],
            },
            NodeKind::Infix { name, .. } => NodeKind::Infix {
                name,
                left: children[0],
                right: children[1],
            },
            NodeKind::Prefix { name, .. } => NodeKind::Prefix {
                name,
                arg: children[0],
            },
            NodeKind::Postfix { name, .. } => NodeKind::Postfix {
                name,
                arg: children[0],
            },
            NodeKind::ImplicitConversion(_) => NodeKind::ImplicitConversion(children[0]),
            NodeKind::PropertyCall { ident, .. } => NodeKind::PropertyCall {
                object: children[0],
                ident,
            },
            NodeKind::IndexCall { .. } => NodeKind::IndexCall {
                collection: children[0],
                index: children[1],
            },
            NodeKind::FunctionCall { .. } => NodeKind::FunctionCall {
                func: children[0],
                args: self.push_list(&children[1..]),
            },
            NodeKind::MethodCall { ident, .. } => NodeKind::MethodCall {
                object: children[0],
                ident,
                args: self.push_list(&children[1..]),
            },
        };
        let span = self.span(id);
        let ty = self.types[id.index()].clone();
        self.push(Node::new(kind, span, ty))
    }

    /// Allocate a copy of `id` with child `index` replaced by `child`.
    pub fn with_child(&mut self, id: NodeId, index: usize, child: NodeId) -> NodeId {
        let mut children = self.children(id);
        assert!(
            index < children.len(),
            "child index {index} out of bounds for {} node {id:?}",
            self.kind(id).tag(),
        );
        children[index] = child;
        self.with_children(id, &children)
    }

    /// Allocate a copy of `id` carrying `ty` as its target type.
    pub fn with_type(&mut self, id: NodeId, ty: Type) -> NodeId {
        if self.ty(id) == Some(&ty) {
            return id;
        }
        let node = Node {
            ty: Some(ty),
            ..self.get(id)
        };
        self.push(node)
    }
}

fn to_u32(len: usize, what: &str) -> u32 {
    match u32::try_from(len) {
        Ok(v) => v,
        Err(_) => panic!("arena overflow: more than u32::MAX {what}"),
    }
}

fn to_u16(len: usize, what: &str) -> u16 {
    match u16::try_from(len) {
        Ok(v) => v,
        Err(_) => panic!("{what} has {len} entries, max is {}", u16::MAX),
    }
}
