//! Node kinds.
//!
//! A closed sum over every node shape the rewrite engine produces or
//! inspects. Children are referenced by [`NodeId`]; lists of children by
//! [`NodeRange`] into the arena's flat list storage.

use num_bigint::BigInt;

use crate::{Name, NodeId, NodeRange, OpCode, Span, Type};

/// The logical content of a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Generic IR
    /// Operation over ordered arguments. The argument count always matches
    /// `op.arity()`.
    Op { op: OpCode, args: NodeRange },
    Identifier(Name),
    /// Arbitrary-precision integer literal.
    Integer(BigInt),
    Text(Name),
    Builtin(Name),
    Assignment { variable: NodeId, expr: NodeId },
    /// Statement sequence.
    Block(NodeRange),

    // Target-level operator shapes
    /// Compound assignment: `variable name= right`.
    MutatingInfix {
        name: Name,
        variable: NodeId,
        right: NodeId,
    },
    Infix {
        name: Name,
        left: NodeId,
        right: NodeId,
    },
    Prefix { name: Name, arg: NodeId },
    Postfix { name: Name, arg: NodeId },

    // Access and calls
    IndexCall { collection: NodeId, index: NodeId },
    FunctionCall { func: NodeId, args: NodeRange },
    MethodCall {
        object: NodeId,
        ident: Name,
        args: NodeRange,
    },
    PropertyCall { object: NodeId, ident: Name },

    /// Type-inference wrapper with no semantic effect.
    ImplicitConversion(NodeId),

    // Collections
    /// Fixed-shape literal.
    Array(NodeRange),
    /// Dynamic-shape literal.
    List(NodeRange),
}

impl NodeKind {
    /// Variant name, as emitted by the stringifier.
    pub const fn tag(&self) -> &'static str {
        match self {
            NodeKind::Op { .. } => "Op",
            NodeKind::Identifier(_) => "Identifier",
            NodeKind::Integer(_) => "Integer",
            NodeKind::Text(_) => "Text",
            NodeKind::Builtin(_) => "Builtin",
            NodeKind::Assignment { .. } => "Assignment",
            NodeKind::Block(_) => "Block",
            NodeKind::MutatingInfix { .. } => "MutatingInfix",
            NodeKind::Infix { .. } => "Infix",
            NodeKind::Prefix { .. } => "Prefix",
            NodeKind::Postfix { .. } => "Postfix",
            NodeKind::IndexCall { .. } => "IndexCall",
            NodeKind::FunctionCall { .. } => "FunctionCall",
            NodeKind::MethodCall { .. } => "MethodCall",
            NodeKind::PropertyCall { .. } => "PropertyCall",
            NodeKind::ImplicitConversion(_) => "ImplicitConversion",
            NodeKind::Array(_) => "Array",
            NodeKind::List(_) => "List",
        }
    }
}

/// A node with its metadata, as passed to and returned from the arena.
///
/// `span` and `ty` are metadata: neither is part of the node's logical
/// identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub ty: Option<Type>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span, ty: Option<Type>) -> Self {
        Self { kind, span, ty }
    }

    /// A node synthesized by a rewrite: no span, no type yet.
    pub fn synthetic(kind: NodeKind) -> Self {
        Self {
            kind,
            span: Span::DUMMY,
            ty: None,
        }
    }
}
