//! Plugin configuration errors.
//!
//! Only configuration that can be checked up front is reported here.
//! Malformed nodes produced while a plugin runs are programming errors and
//! panic instead (see `tern_ir::validate_arity`).

use tern_ir::{Arity, OpCode};

/// A plugin was configured with an op code it cannot handle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The builder cannot render ops of this arity class.
    #[error("`{code}` is a {arity} op; expected {expected}")]
    UnsupportedArity {
        code: OpCode,
        arity: Arity,
        expected: &'static str,
    },

    /// `backwards_index_to_forwards` was given a forward code.
    #[error("`{code}` does not index from the end")]
    NotBackwardIndex { code: OpCode },

    /// `use_index_calls` was given something other than an index load/store.
    #[error("`{code}` is not an index load or store")]
    NotIndexOp { code: OpCode },
}
