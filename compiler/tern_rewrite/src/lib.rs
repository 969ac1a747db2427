//! Tern Rewrite - op-rewriting engine
//!
//! Lowers the generic op IR from `tern_ir` toward a target language's
//! native operator forms. Every rewrite is a [`Plugin`]: a pure function
//! from a tree position to an optional replacement node.
//!
//! # Components
//!
//! - [`map_ops()`] / [`MapTo`]: table-driven op rewrites, the one place that
//!   dispatches on op codes
//! - [`MapUnaryAndBinary`]: prefix and left-associated infix chains
//! - [`AddMutatingInfix`] / [`AddIncAndDec`]: `a = a + b` → `a += b` → `a++`
//! - [`BackwardsIndexToForwards`] / [`UseIndexCalls`]: index direction and
//!   index-call lowering
//! - [`canonical`]: flips, wrapper removal, method calls, array literals
//! - [`PassRunner`]: a reference driver applying plugins over a tree
//!
//! Structural equality always goes through `NodeArena::stringify`.

pub mod canonical;
mod chain;
mod driver;
mod error;
mod index;
mod map_ops;
mod mutating;
mod plugin;

pub use canonical::{
    flip_binary_ops, print_int_to_print, ArraysToLists, FlipBinaryOps, MethodsAsFunctions,
    RemoveImplicitConversions,
};
pub use chain::{BinaryBuilder, MapUnaryAndBinary, MutatingTargets, UnaryBuilder};
pub use driver::{PassRunner, Traversal, DEFAULT_REWRITE_LIMIT};
pub use error::ConfigError;
pub use index::{BackwardsIndexToForwards, UseIndexCalls};
pub use map_ops::{
    function_ops, infix_ops, map_ops, Args, MapOps, MapTo, OpFn, OpTransform, OperatorTable,
    Predicate,
};
pub use mutating::{AddIncAndDec, AddMutatingInfix, IncDecFn};
pub use plugin::{FirstOf, Plugin};
