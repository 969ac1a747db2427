//! Tern IR - expression arena for the op-rewriting engine
//!
//! This crate contains the data model every rewrite operates on:
//! - Arena-allocated nodes addressed by [`NodeId`]
//! - Op codes with their static metadata ([`OpCode`], [`Arity`], [`Seq`])
//! - Smart constructors and predicates over nodes
//! - The [`Spine`] traversal handle with copy-on-write replace
//! - Canonical stringification, the one structural-equality check
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers and operator symbols → `Name(u32)`
//! - **Flatten Everything**: no `Box<Node>`, children are `NodeId(u32)`
//! - **Never Mutate**: a node is fixed once pushed; rewrites allocate
//!
//! Spans and target types ride alongside each node but are metadata, not
//! part of its logical identity.

mod arena;
mod build;
mod ids;
mod interner;
mod name;
mod node;
mod op_code;
mod span;
mod spine;
mod stringify;
mod types;
mod validate;

pub use arena::{Children, NodeArena};
pub use ids::{NodeId, NodeRange};
pub use interner::StringInterner;
pub use name::Name;
pub use node::{Node, NodeKind};
pub use op_code::{Arity, OpCode, PrintKind, Seq};
pub use span::Span;
pub use spine::Spine;
pub use stringify::StringifyCache;
pub use types::{IntRange, Type};
pub use validate::{is_well_formed, validate_arity, validate_node};

pub use num_bigint::BigInt;
