//! Stack growth for deep recursion.
//!
//! Rewritten programs can nest thousands of levels deep (a long `a - b - c
//! - ...` chain is one level per operand). The tree walks in `tern_ir` and
//! `tern_rewrite` recurse once per level, so each recursive body runs
//! inside [`ensure_sufficient_stack`], which moves onto a freshly allocated
//! stack segment when the current one runs low.
//!
//! On `wasm32` the call is a plain passthrough.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a new stack segment if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
