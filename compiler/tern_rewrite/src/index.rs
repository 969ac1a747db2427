//! Index-direction normalization.
//!
//! [`BackwardsIndexToForwards`] must run before [`UseIndexCalls`] when the
//! target is one-indexed: the from-end arithmetic assumes zero-based
//! indices, and the one-based offset is added afterwards.

use std::fmt::Write as _;

use tern_ir::{NodeArena, NodeId, OpCode, Seq, Spine};

use crate::map_ops::Args;
use crate::{ConfigError, Plugin};

/// Plugin rewriting from-end indexing and slicing into forward form.
///
/// `at_back[S](c, i)` becomes `at[S](c, i + size[S](c))` when `add_length`
/// is set, or `at[S](c, i)` for targets whose forward index already accepts
/// negative offsets. Stores and slices carry their third argument through.
pub struct BackwardsIndexToForwards {
    name: String,
    add_length: bool,
    codes: Vec<OpCode>,
}

impl BackwardsIndexToForwards {
    /// Codes rewritten by [`all`](Self::all).
    pub const DEFAULT_CODES: [OpCode; 9] = [
        OpCode::AtBack(Seq::Ascii),
        OpCode::AtBack(Seq::Byte),
        OpCode::AtBack(Seq::Codepoint),
        OpCode::AtBack(Seq::List),
        OpCode::SetAtBack(Seq::List),
        OpCode::SliceBack(Seq::Ascii),
        OpCode::SliceBack(Seq::Byte),
        OpCode::SliceBack(Seq::Codepoint),
        OpCode::SliceBack(Seq::List),
    ];

    /// # Errors
    /// Returns [`ConfigError::NotBackwardIndex`] for a code with no forward
    /// counterpart.
    pub fn new(
        add_length: bool,
        codes: impl IntoIterator<Item = OpCode>,
    ) -> Result<Self, ConfigError> {
        let codes: Vec<OpCode> = codes.into_iter().collect();
        if let Some(&code) = codes.iter().find(|code| code.forward().is_none()) {
            return Err(ConfigError::NotBackwardIndex { code });
        }
        Ok(Self::from_codes(add_length, codes))
    }

    /// Every from-end code over lists and text.
    pub fn all(add_length: bool) -> Self {
        Self::from_codes(add_length, Self::DEFAULT_CODES.to_vec())
    }

    fn from_codes(add_length: bool, codes: Vec<OpCode>) -> Self {
        Self {
            name: format!(
                "backwards_index_to_forwards({add_length}, {})",
                code_list(&codes)
            ),
            add_length,
            codes,
        }
    }
}

impl Plugin for BackwardsIndexToForwards {
    fn name(&self) -> &str {
        &self.name
    }

    fn visit(&self, arena: &mut NodeArena, spine: &Spine<'_>) -> Option<NodeId> {
        let (code, args) = arena.op_args(spine.node())?;
        if !self.codes.contains(&code) {
            return None;
        }
        let forward = code.forward()?;
        let seq = code.seq()?;
        let mut args: Args = args.iter().copied().collect();

        if self.add_length {
            let size = arena.op(OpCode::Size(seq), &[args[0]]);
            args[1] = arena.op(OpCode::Add, &[args[1], size]);
        }
        Some(arena.op(forward, &args))
    }
}

/// Plugin lowering index loads and stores to `IndexCall`.
///
/// A load becomes `c[i]`; a store becomes `c[i] = v`, but only when `c` is
/// a bare identifier. With `one_indexed`, non-table indices get `+ 1`.
pub struct UseIndexCalls {
    name: String,
    one_indexed: bool,
    codes: Vec<OpCode>,
}

impl UseIndexCalls {
    /// Codes rewritten by [`defaults`](Self::defaults).
    pub const DEFAULT_CODES: [OpCode; 8] = [
        OpCode::At(Seq::Array),
        OpCode::At(Seq::List),
        OpCode::AtBack(Seq::List),
        OpCode::At(Seq::Table),
        OpCode::SetAt(Seq::Array),
        OpCode::SetAt(Seq::List),
        OpCode::SetAtBack(Seq::List),
        OpCode::SetAt(Seq::Table),
    ];

    /// # Errors
    /// Returns [`ConfigError::NotIndexOp`] for a code that is not an index
    /// load or store.
    pub fn new(
        one_indexed: bool,
        codes: impl IntoIterator<Item = OpCode>,
    ) -> Result<Self, ConfigError> {
        let codes: Vec<OpCode> = codes.into_iter().collect();
        if let Some(&code) = codes.iter().find(|&&code| !is_index_op(code)) {
            return Err(ConfigError::NotIndexOp { code });
        }
        Ok(Self::from_codes(one_indexed, codes))
    }

    /// Loads and stores over arrays, lists and tables.
    pub fn defaults(one_indexed: bool) -> Self {
        Self::from_codes(one_indexed, Self::DEFAULT_CODES.to_vec())
    }

    fn from_codes(one_indexed: bool, codes: Vec<OpCode>) -> Self {
        Self {
            name: format!("use_index_calls({one_indexed}, {})", code_list(&codes)),
            one_indexed,
            codes,
        }
    }
}

impl Plugin for UseIndexCalls {
    fn name(&self) -> &str {
        &self.name
    }

    fn bakes_type(&self) -> bool {
        true
    }

    fn visit(&self, arena: &mut NodeArena, spine: &Spine<'_>) -> Option<NodeId> {
        let (code, args) = arena.op_args(spine.node())?;
        if !self.codes.contains(&code) {
            return None;
        }
        let store = code.is_store();
        if store && !arena.is_ident(args[0]) {
            return None;
        }
        let seq = code.seq()?;
        let args: Args = args.iter().copied().collect();

        let index = if self.one_indexed && !seq.is_table_like() {
            arena.add1(args[1])
        } else {
            args[1]
        };
        let call = arena.index_call(args[0], index);
        if store {
            Some(arena.assignment(call, args[2]))
        } else {
            Some(call)
        }
    }
}

fn is_index_op(code: OpCode) -> bool {
    matches!(
        code,
        OpCode::At(_) | OpCode::AtBack(_) | OpCode::SetAt(_) | OpCode::SetAtBack(_)
    )
}

fn code_list(codes: &[OpCode]) -> String {
    let mut out = String::from("[");
    for (i, code) in codes.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{code}");
    }
    out.push(']');
    out
}
