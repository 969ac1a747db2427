//! Target type annotations.
//!
//! Attached to nodes by the (external) type pass. Like spans, a type is
//! metadata; unlike spans, callers of the stringifier choose whether it takes
//! part in structural equality.

use std::fmt;

use num_bigint::BigInt;

/// Inclusive integer range; `None` bounds are unbounded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntRange {
    pub min: Option<BigInt>,
    pub max: Option<BigInt>,
}

impl IntRange {
    /// The unbounded range.
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    pub fn new(min: impl Into<BigInt>, max: impl Into<BigInt>) -> Self {
        Self {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    /// The single-value range `[v, v]`.
    pub fn exact(v: impl Into<BigInt>) -> Self {
        let v = v.into();
        Self {
            min: Some(v.clone()),
            max: Some(v),
        }
    }
}

impl fmt::Display for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.min {
            Some(v) => write!(f, "{v}")?,
            None => f.write_str("-oo")?,
        }
        f.write_str("..")?;
        match &self.max {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("oo"),
        }
    }
}

/// A value type in the target language.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Boolean,
    Integer(IntRange),
    Text,
    List(Box<Type>),
    Array(Box<Type>, u32),
    Table(Box<Type>, Box<Type>),
}

impl Type {
    /// Unbounded integer.
    pub const fn int() -> Self {
        Type::Integer(IntRange::unbounded())
    }

    pub fn list(elem: Type) -> Self {
        Type::List(Box::new(elem))
    }

    pub fn array(elem: Type, len: u32) -> Self {
        Type::Array(Box::new(elem), len)
    }

    pub fn table(key: Type, value: Type) -> Self {
        Type::Table(Box::new(key), Box::new(value))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => f.write_str("void"),
            Type::Boolean => f.write_str("bool"),
            Type::Integer(range) => write!(f, "int[{range}]"),
            Type::Text => f.write_str("text"),
            Type::List(elem) => write!(f, "List<{elem}>"),
            Type::Array(elem, len) => write!(f, "Array<{elem}, {len}>"),
            Type::Table(key, value) => write!(f, "Table<{key}, {value}>"),
        }
    }
}
