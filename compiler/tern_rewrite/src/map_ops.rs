//! Op-map plugin builder.
//!
//! [`MapOps`] is the primitive every other plugin is built from: a table
//! from op code to replacement. It is the only place that dispatches on
//! `Op.code`; the other builders assemble a table and delegate here.
//!
//! [`MapTo`] curries a node constructor against an [`OperatorTable`], so a
//! target can say "render these codes as infix with these symbols" in one
//! line.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;
use tern_ir::{NodeArena, NodeId, OpCode, Spine};

use crate::{ConfigError, Plugin};

/// Argument buffer handed to op transforms.
pub type Args = SmallVec<[NodeId; 4]>;

/// Builds a replacement from an op's arguments, or declines.
pub type OpFn = Box<dyn Fn(&mut NodeArena, &[NodeId], &Spine<'_>) -> Option<NodeId>>;

/// Gate over a node position, used by [`MapTo::build_when`].
pub type Predicate = Rc<dyn Fn(&NodeArena, &Spine<'_>) -> bool>;

/// What an op code maps to in a [`MapOps`] table.
pub enum OpTransform {
    /// Replace the op with this node.
    Replace(NodeId),
    /// Compute the replacement from the op's arguments.
    Build(OpFn),
}

impl OpTransform {
    pub fn build<F>(f: F) -> Self
    where
        F: Fn(&mut NodeArena, &[NodeId], &Spine<'_>) -> Option<NodeId> + 'static,
    {
        OpTransform::Build(Box::new(f))
    }
}

impl fmt::Debug for OpTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpTransform::Replace(id) => write!(f, "Replace({id:?})"),
            OpTransform::Build(_) => f.write_str("Build(..)"),
        }
    }
}

/// Plugin mapping op codes to replacements.
pub struct MapOps {
    name: String,
    table: BTreeMap<OpCode, OpTransform>,
    bakes_type: bool,
}

/// Build a [`MapOps`] plugin. Codes absent from `table` are left untouched.
pub fn map_ops(
    name: impl Into<String>,
    table: impl IntoIterator<Item = (OpCode, OpTransform)>,
) -> MapOps {
    MapOps {
        name: name.into(),
        table: table.into_iter().collect(),
        bakes_type: true,
    }
}

impl Plugin for MapOps {
    fn name(&self) -> &str {
        &self.name
    }

    fn bakes_type(&self) -> bool {
        self.bakes_type
    }

    fn visit(&self, arena: &mut NodeArena, spine: &Spine<'_>) -> Option<NodeId> {
        let (code, args) = arena.op_args(spine.node())?;
        let transform = self.table.get(&code)?;
        match transform {
            OpTransform::Replace(id) => Some(*id),
            OpTransform::Build(f) => {
                let args: Args = args.iter().copied().collect();
                f(arena, &args, spine)
            }
        }
    }
}

/// Ordered `{code → value}` configuration table.
///
/// Ordered so that names derived from the table are deterministic.
#[derive(Clone, PartialEq, Eq)]
pub struct OperatorTable<T> {
    entries: BTreeMap<OpCode, T>,
}

impl<T> OperatorTable<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace an entry.
    #[must_use]
    pub fn with(mut self, code: OpCode, value: T) -> Self {
        self.entries.insert(code, value);
        self
    }

    pub fn get(&self, code: OpCode) -> Option<&T> {
        self.entries.get(&code)
    }

    pub fn contains(&self, code: OpCode) -> bool {
        self.entries.contains_key(&code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (OpCode, &T)> + '_ {
        self.entries.iter().map(|(code, v)| (*code, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only entries matching `keep`.
    #[must_use]
    pub fn filtered(mut self, mut keep: impl FnMut(OpCode, &T) -> bool) -> Self {
        self.entries.retain(|code, v| keep(*code, v));
        self
    }
}

impl<T: Clone> OperatorTable<T> {
    /// Fill `unsafe_and`/`unsafe_or` from `and`/`or` where absent.
    ///
    /// Targets without an eager boolean operator render both forms the same
    /// way. Applied once, by the builders that take a table.
    #[must_use]
    pub fn with_short_circuit_defaults(mut self) -> Self {
        for (eager, short_circuit) in [
            (OpCode::UnsafeAnd, OpCode::And),
            (OpCode::UnsafeOr, OpCode::Or),
        ] {
            if !self.entries.contains_key(&eager) {
                if let Some(v) = self.entries.get(&short_circuit).cloned() {
                    self.entries.insert(eager, v);
                }
            }
        }
        self
    }
}

impl<T> Default for OperatorTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(OpCode, T)> for OperatorTable<T> {
    fn from_iter<I: IntoIterator<Item = (OpCode, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'s> FromIterator<(OpCode, &'s str)> for OperatorTable<String> {
    fn from_iter<I: IntoIterator<Item = (OpCode, &'s str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(code, name)| (code, name.to_owned()))
            .collect()
    }
}

impl<T: fmt::Debug> fmt::Display for OperatorTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (code, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{code}: {value:?}")?;
        }
        f.write_str("}")
    }
}

impl<T: fmt::Debug> fmt::Debug for OperatorTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A node constructor curried over an [`OperatorTable`].
///
/// `label` names the constructor in derived plugin names, e.g.
/// `map_to(infix)({add: "+"})`.
pub struct MapTo<T, C> {
    label: &'static str,
    ctor: Rc<C>,
    _values: std::marker::PhantomData<fn(T)>,
}

impl<T, C> MapTo<T, C>
where
    T: Clone + fmt::Debug + 'static,
    C: Fn(&mut NodeArena, &T, &[NodeId]) -> NodeId + 'static,
{
    pub fn new(label: &'static str, ctor: C) -> Self {
        Self {
            label,
            ctor: Rc::new(ctor),
            _values: std::marker::PhantomData,
        }
    }

    /// Plugin replacing every op in `table` with the constructor's output.
    pub fn build(&self, table: OperatorTable<T>) -> MapOps {
        self.assemble(table, None)
    }

    /// Like [`build`](Self::build), but only where `predicate` holds.
    pub fn build_when<P>(&self, table: OperatorTable<T>, predicate: P) -> MapOps
    where
        P: Fn(&NodeArena, &Spine<'_>) -> bool + 'static,
    {
        self.assemble(table, Some(Rc::new(predicate)))
    }

    fn assemble(&self, table: OperatorTable<T>, predicate: Option<Predicate>) -> MapOps {
        let table = table.with_short_circuit_defaults();
        let mut name = format!("map_to({})({table})", self.label);
        if predicate.is_some() {
            name.push_str(" when ..");
        }
        let transforms = table.entries.into_iter().map(|(code, value)| {
            let ctor = Rc::clone(&self.ctor);
            let predicate = predicate.clone();
            let transform = OpTransform::build(move |arena, args, spine| {
                if predicate.as_ref().is_some_and(|p| !p(&*arena, spine)) {
                    return None;
                }
                Some(ctor(arena, &value, args))
            });
            (code, transform)
        });
        map_ops(name, transforms)
    }
}

/// `map_to(infix)`: render each op as a left-nested chain of infix nodes.
///
/// # Errors
/// Returns [`ConfigError::UnsupportedArity`] for a unary or ternary code;
/// an infix chain has no rendering for either.
pub fn infix_ops(table: OperatorTable<String>) -> Result<MapOps, ConfigError> {
    if let Some((code, _)) = table.iter().find(|(code, _)| !code.is_chainable()) {
        return Err(ConfigError::UnsupportedArity {
            code,
            arity: code.arity(),
            expected: "binary or variadic",
        });
    }
    let plugin = MapTo::new("infix", |arena: &mut NodeArena, name: &String, args: &[NodeId]| {
        let mut result = args[0];
        for &arg in &args[1..] {
            result = arena.infix(name, result, arg);
        }
        result
    })
    .build(table);
    Ok(plugin)
}

/// `map_to(function_call)`: render each op as a call to a builtin.
pub fn function_ops(table: OperatorTable<String>) -> MapOps {
    MapTo::new(
        "function_call",
        |arena: &mut NodeArena, name: &String, args: &[NodeId]| {
            let func = arena.builtin(name);
            arena.function_call(func, args)
        },
    )
    .build(table)
}
