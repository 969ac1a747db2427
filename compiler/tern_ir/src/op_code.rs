//! Operation codes and their static metadata.
//!
//! This is the fixed lookup service the rewrite engine queries: arity class,
//! commutativity, flipped and negated counterparts. Collection-specific codes
//! are parameterized by [`Seq`] instead of being spelled out per kind.

use std::fmt;

/// Collection kind of an indexing, slicing or size operation.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Seq {
    /// Fixed-shape homogeneous collection.
    Array,
    /// Dynamic-shape homogeneous collection.
    List,
    /// Key-value table; indexed in its native key space.
    Table,
    /// Text known to be ASCII (bytes and characters coincide).
    Ascii,
    /// Text viewed as UTF-8 bytes.
    Byte,
    /// Text viewed as Unicode codepoints.
    Codepoint,
}

impl Seq {
    pub const ALL: [Seq; 6] = [
        Seq::Array,
        Seq::List,
        Seq::Table,
        Seq::Ascii,
        Seq::Byte,
        Seq::Codepoint,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Seq::Array => "Array",
            Seq::List => "List",
            Seq::Table => "Table",
            Seq::Ascii => "Ascii",
            Seq::Byte => "byte",
            Seq::Codepoint => "codepoint",
        }
    }

    /// Table-like kinds use their native key space and never take a
    /// one-based offset.
    pub const fn is_table_like(self) -> bool {
        matches!(self, Seq::Table)
    }
}

/// Operand type of a print operation.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum PrintKind {
    Int,
    Text,
}

impl PrintKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            PrintKind::Int => "Int",
            PrintKind::Text => "Text",
        }
    }
}

/// Arity class of an op code.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Arity {
    /// Exactly one argument.
    Unary,
    /// Exactly two arguments.
    Binary,
    /// Exactly three arguments; never rendered as an operator chain.
    Ternary,
    /// One or more arguments, associative.
    Variadic,
}

impl Arity {
    /// Returns `true` if an op of this class may have `n` arguments.
    pub const fn accepts(self, n: usize) -> bool {
        match self {
            Arity::Unary => n == 1,
            Arity::Binary => n == 2,
            Arity::Ternary => n == 3,
            Arity::Variadic => n >= 1,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Arity::Unary => "unary",
            Arity::Binary => "binary",
            Arity::Ternary => "ternary",
            Arity::Variadic => "variadic",
        })
    }
}

/// Operation code.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum OpCode {
    // Unary
    Neg,
    BitNot,
    Not,
    IntToDec,
    Size(Seq),
    Print(PrintKind),
    Println(PrintKind),

    // Binary arithmetic
    Sub,
    Div,
    Mod,
    Pow,
    BitShiftLeft,
    BitShiftRight,

    // Comparison
    Lt,
    Leq,
    Eq,
    Neq,
    Geq,
    Gt,

    // Logical
    And,
    Or,
    UnsafeAnd,
    UnsafeOr,

    // Collections
    At(Seq),
    AtBack(Seq),
    Contains(Seq),
    SetAt(Seq),
    SetAtBack(Seq),
    Slice(Seq),
    SliceBack(Seq),

    // Variadic
    Add,
    Mul,
    BitAnd,
    BitOr,
    BitXor,
    Min,
    Max,
    Concat,
}

impl OpCode {
    /// Every op code, in declaration order.
    pub fn all() -> impl Iterator<Item = OpCode> {
        let plain: [OpCode; 32] = [
            OpCode::Neg,
            OpCode::BitNot,
            OpCode::Not,
            OpCode::IntToDec,
            OpCode::Print(PrintKind::Int),
            OpCode::Print(PrintKind::Text),
            OpCode::Println(PrintKind::Int),
            OpCode::Println(PrintKind::Text),
            OpCode::Sub,
            OpCode::Div,
            OpCode::Mod,
            OpCode::Pow,
            OpCode::BitShiftLeft,
            OpCode::BitShiftRight,
            OpCode::Lt,
            OpCode::Leq,
            OpCode::Eq,
            OpCode::Neq,
            OpCode::Geq,
            OpCode::Gt,
            OpCode::And,
            OpCode::Or,
            OpCode::UnsafeAnd,
            OpCode::UnsafeOr,
            OpCode::Add,
            OpCode::Mul,
            OpCode::BitAnd,
            OpCode::BitOr,
            OpCode::BitXor,
            OpCode::Min,
            OpCode::Max,
            OpCode::Concat,
        ];
        let per_seq: [fn(Seq) -> OpCode; 8] = [
            OpCode::Size,
            OpCode::At,
            OpCode::AtBack,
            OpCode::Contains,
            OpCode::SetAt,
            OpCode::SetAtBack,
            OpCode::Slice,
            OpCode::SliceBack,
        ];
        plain.into_iter().chain(
            per_seq
                .into_iter()
                .flat_map(|make| Seq::ALL.into_iter().map(make)),
        )
    }

    pub const fn arity(self) -> Arity {
        match self {
            OpCode::Neg
            | OpCode::BitNot
            | OpCode::Not
            | OpCode::IntToDec
            | OpCode::Size(_)
            | OpCode::Print(_)
            | OpCode::Println(_) => Arity::Unary,

            OpCode::Sub
            | OpCode::Div
            | OpCode::Mod
            | OpCode::Pow
            | OpCode::BitShiftLeft
            | OpCode::BitShiftRight
            | OpCode::Lt
            | OpCode::Leq
            | OpCode::Eq
            | OpCode::Neq
            | OpCode::Geq
            | OpCode::Gt
            | OpCode::And
            | OpCode::Or
            | OpCode::UnsafeAnd
            | OpCode::UnsafeOr
            | OpCode::At(_)
            | OpCode::AtBack(_)
            | OpCode::Contains(_) => Arity::Binary,

            OpCode::SetAt(_) | OpCode::SetAtBack(_) | OpCode::Slice(_) | OpCode::SliceBack(_) => {
                Arity::Ternary
            }

            OpCode::Add
            | OpCode::Mul
            | OpCode::BitAnd
            | OpCode::BitOr
            | OpCode::BitXor
            | OpCode::Min
            | OpCode::Max
            | OpCode::Concat => Arity::Variadic,
        }
    }

    #[inline]
    pub const fn is_unary(self) -> bool {
        matches!(self.arity(), Arity::Unary)
    }

    #[inline]
    pub const fn is_binary(self) -> bool {
        matches!(self.arity(), Arity::Binary)
    }

    #[inline]
    pub const fn is_variadic(self) -> bool {
        matches!(self.arity(), Arity::Variadic)
    }

    /// Binary or variadic: the codes a binary chain can be built from.
    #[inline]
    pub const fn is_chainable(self) -> bool {
        matches!(self.arity(), Arity::Binary | Arity::Variadic)
    }

    /// Returns `true` if operands may be reordered without changing the value.
    pub const fn is_commutative(self) -> bool {
        matches!(
            self,
            OpCode::Add
                | OpCode::Mul
                | OpCode::BitAnd
                | OpCode::BitOr
                | OpCode::BitXor
                | OpCode::Min
                | OpCode::Max
                | OpCode::Eq
                | OpCode::Neq
                | OpCode::UnsafeAnd
                | OpCode::UnsafeOr
        )
    }

    /// The code that yields the same value with the two arguments swapped.
    ///
    /// Involution: `c.flipped().and_then(OpCode::flipped) == Some(c)`.
    pub const fn flipped(self) -> Option<OpCode> {
        match self {
            OpCode::Lt => Some(OpCode::Gt),
            OpCode::Gt => Some(OpCode::Lt),
            OpCode::Leq => Some(OpCode::Geq),
            OpCode::Geq => Some(OpCode::Leq),
            _ => None,
        }
    }

    /// The code computing the boolean negation of this comparison.
    pub const fn negated(self) -> Option<OpCode> {
        match self {
            OpCode::Lt => Some(OpCode::Geq),
            OpCode::Geq => Some(OpCode::Lt),
            OpCode::Gt => Some(OpCode::Leq),
            OpCode::Leq => Some(OpCode::Gt),
            OpCode::Eq => Some(OpCode::Neq),
            OpCode::Neq => Some(OpCode::Eq),
            _ => None,
        }
    }

    /// Collection kind for collection codes.
    pub const fn seq(self) -> Option<Seq> {
        match self {
            OpCode::Size(s)
            | OpCode::At(s)
            | OpCode::AtBack(s)
            | OpCode::Contains(s)
            | OpCode::SetAt(s)
            | OpCode::SetAtBack(s)
            | OpCode::Slice(s)
            | OpCode::SliceBack(s) => Some(s),
            _ => None,
        }
    }

    /// Forward-indexing equivalent of a from-end code.
    pub const fn forward(self) -> Option<OpCode> {
        match self {
            OpCode::AtBack(s) => Some(OpCode::At(s)),
            OpCode::SetAtBack(s) => Some(OpCode::SetAt(s)),
            OpCode::SliceBack(s) => Some(OpCode::Slice(s)),
            _ => None,
        }
    }

    /// Returns `true` for stores (`set_at`, `set_at_back`).
    pub const fn is_store(self) -> bool {
        matches!(self, OpCode::SetAt(_) | OpCode::SetAtBack(_))
    }

    /// Base name without the collection or print suffix.
    pub const fn base_name(self) -> &'static str {
        match self {
            OpCode::Neg => "neg",
            OpCode::BitNot => "bit_not",
            OpCode::Not => "not",
            OpCode::IntToDec => "int_to_dec",
            OpCode::Size(_) => "size",
            OpCode::Print(_) => "print",
            OpCode::Println(_) => "println",
            OpCode::Sub => "sub",
            OpCode::Div => "div",
            OpCode::Mod => "mod",
            OpCode::Pow => "pow",
            OpCode::BitShiftLeft => "bit_shift_left",
            OpCode::BitShiftRight => "bit_shift_right",
            OpCode::Lt => "lt",
            OpCode::Leq => "leq",
            OpCode::Eq => "eq",
            OpCode::Neq => "neq",
            OpCode::Geq => "geq",
            OpCode::Gt => "gt",
            OpCode::And => "and",
            OpCode::Or => "or",
            OpCode::UnsafeAnd => "unsafe_and",
            OpCode::UnsafeOr => "unsafe_or",
            OpCode::At(_) => "at",
            OpCode::AtBack(_) => "at_back",
            OpCode::Contains(_) => "contains",
            OpCode::SetAt(_) => "set_at",
            OpCode::SetAtBack(_) => "set_at_back",
            OpCode::Slice(_) => "slice",
            OpCode::SliceBack(_) => "slice_back",
            OpCode::Add => "add",
            OpCode::Mul => "mul",
            OpCode::BitAnd => "bit_and",
            OpCode::BitOr => "bit_or",
            OpCode::BitXor => "bit_xor",
            OpCode::Min => "min",
            OpCode::Max => "max",
            OpCode::Concat => "concat",
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_name())?;
        match self {
            OpCode::Print(k) | OpCode::Println(k) => write!(f, "[{}]", k.as_str()),
            _ => match self.seq() {
                Some(s) => write!(f, "[{}]", s.as_str()),
                None => Ok(()),
            },
        }
    }
}
