//! Arity validation.
//!
//! Walks a tree and asserts that every `Op` node carries an argument count
//! its op code's arity class accepts. A violation is a bug in whichever
//! rewrite built the node, so it panics with the offending op and path
//! rather than returning an error.

use rustc_hash::FxHashSet;

use crate::{NodeArena, NodeId, NodeKind};

/// Validate the arity invariant for every node reachable from `root`.
///
/// # Panics
/// Panics on the first `Op` whose argument count violates its arity class.
pub fn validate_arity(arena: &NodeArena, root: NodeId) {
    let mut seen = FxHashSet::default();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        validate_node(arena, id);
        stack.extend(arena.children(id));
    }
}

/// Validate the arity invariant for `id` alone, without its children.
///
/// # Panics
/// Panics if `id` is out of bounds or is an `Op` with a bad argument count.
pub fn validate_node(arena: &NodeArena, id: NodeId) {
    assert!(
        id.index() < arena.len(),
        "{id:?} out of bounds (arena has {} nodes)",
        arena.len(),
    );
    if let NodeKind::Op { op, args } = arena.kind(id) {
        assert!(
            op.arity().accepts(args.len()),
            "{id:?}: {} op `{op}` has {} argument(s)",
            op.arity(),
            args.len(),
        );
    }
}

/// Returns `true` if every node reachable from `root` is well-formed.
pub fn is_well_formed(arena: &NodeArena, root: NodeId) -> bool {
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if let NodeKind::Op { op, args } = arena.kind(id) {
            if !op.arity().accepts(args.len()) {
                return false;
            }
        }
        stack.extend(arena.children(id));
    }
    true
}
