//! Binary-chain canonicalization.
//!
//! Renders unary ops as prefix nodes and binary/variadic ops as a
//! left-associated chain of binary nodes in the target's operator names.
//! For `add` the chain is normalized so negative-looking operands trail and
//! become native subtraction; `mul(-1, x, ..)` becomes a unary negation.

use std::fmt;
use std::rc::Rc;

use tern_ir::{NodeArena, NodeId, OpCode, Spine};

use crate::map_ops::{map_ops, Args, MapOps, OpTransform, OperatorTable};
use crate::mutating::AddMutatingInfix;
use crate::{ConfigError, Plugin};

/// Builds a unary target node: `(arena, operator, operand)`.
pub type UnaryBuilder = Rc<dyn Fn(&mut NodeArena, &str, NodeId) -> NodeId>;

/// Builds a binary target node: `(arena, operator, left, right)`.
pub type BinaryBuilder = Rc<dyn Fn(&mut NodeArena, &str, NodeId, NodeId) -> NodeId>;

/// Which chain operators also get a mutating-assignment form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MutatingTargets {
    #[default]
    None,
    /// Every binary or variadic entry.
    All,
    /// Entries whose target operator name is listed.
    Only(Vec<String>),
}

impl MutatingTargets {
    /// Allow-list of operator names.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MutatingTargets::Only(names.into_iter().map(Into::into).collect())
    }

    fn includes(&self, name: &str) -> bool {
        match self {
            MutatingTargets::None => false,
            MutatingTargets::All => true,
            MutatingTargets::Only(names) => names.iter().any(|n| n == name),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            MutatingTargets::None => true,
            MutatingTargets::All => false,
            MutatingTargets::Only(names) => names.is_empty(),
        }
    }
}

impl fmt::Display for MutatingTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutatingTargets::None => f.write_str("none"),
            MutatingTargets::All => f.write_str("all"),
            MutatingTargets::Only(names) => write!(f, "{names:?}"),
        }
    }
}

/// Plugin mapping ops to prefix and infix chains, optionally preferring
/// mutating assignment.
pub struct MapUnaryAndBinary {
    chain: MapOps,
    mutating: Option<AddMutatingInfix>,
}

impl MapUnaryAndBinary {
    /// Render with [`NodeArena::prefix`] and [`NodeArena::infix`].
    ///
    /// # Errors
    /// Returns [`ConfigError::UnsupportedArity`] if `table` has a ternary code.
    pub fn new(
        table: OperatorTable<String>,
        targets: MutatingTargets,
    ) -> Result<Self, ConfigError> {
        Self::with_builders(
            table,
            targets,
            |arena, name, arg| arena.prefix(name, arg),
            |arena, name, left, right| arena.infix(name, left, right),
        )
    }

    /// Render with custom node builders.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnsupportedArity`] if `table` has a ternary code.
    pub fn with_builders<U, B>(
        table: OperatorTable<String>,
        targets: MutatingTargets,
        unary: U,
        binary: B,
    ) -> Result<Self, ConfigError>
    where
        U: Fn(&mut NodeArena, &str, NodeId) -> NodeId + 'static,
        B: Fn(&mut NodeArena, &str, NodeId, NodeId) -> NodeId + 'static,
    {
        if let Some((code, _)) = table
            .iter()
            .find(|(code, _)| !code.is_unary() && !code.is_chainable())
        {
            return Err(ConfigError::UnsupportedArity {
                code,
                arity: code.arity(),
                expected: "unary, binary or variadic",
            });
        }
        let table = table.with_short_circuit_defaults();
        let unary: UnaryBuilder = Rc::new(unary);
        let binary: BinaryBuilder = Rc::new(binary);

        let name = format!("map_unary_and_binary({table}, {targets})");
        let neg = table.get(OpCode::Neg).cloned();
        let sub = table.get(OpCode::Sub).cloned();
        let transforms: Vec<(OpCode, OpTransform)> = table
            .iter()
            .map(|(code, op_name)| {
                let op_name = op_name.clone();
                let unary = Rc::clone(&unary);
                let transform = if code.is_unary() {
                    OpTransform::build(move |arena, args, _| {
                        Some(unary(arena, &op_name, args[0]))
                    })
                } else {
                    let names = ChainNames {
                        op: op_name,
                        neg: neg.clone(),
                        sub: sub.clone(),
                    };
                    let binary = Rc::clone(&binary);
                    OpTransform::build(move |arena, args, _| {
                        Some(as_binary_chain(arena, code, args, &names, &*unary, &*binary))
                    })
                };
                (code, transform)
            })
            .collect();
        let chain = map_ops(name, transforms);

        let mutating = if targets.is_empty() {
            None
        } else {
            let mutating_table = table.filtered(|code, op_name| {
                code.is_chainable() && targets.includes(op_name)
            });
            Some(AddMutatingInfix::new(mutating_table)?)
        };
        Ok(Self { chain, mutating })
    }
}

impl Plugin for MapUnaryAndBinary {
    fn name(&self) -> &str {
        self.chain.name()
    }

    fn bakes_type(&self) -> bool {
        self.chain.bakes_type()
    }

    fn visit(&self, arena: &mut NodeArena, spine: &Spine<'_>) -> Option<NodeId> {
        if let Some(mutating) = &self.mutating {
            if let Some(replacement) = mutating.visit(arena, spine) {
                return Some(replacement);
            }
        }
        self.chain.visit(arena, spine)
    }
}

struct ChainNames {
    op: String,
    neg: Option<String>,
    sub: Option<String>,
}

fn as_binary_chain(
    arena: &mut NodeArena,
    code: OpCode,
    args: &[NodeId],
    names: &ChainNames,
    unary: &dyn Fn(&mut NodeArena, &str, NodeId) -> NodeId,
    binary: &dyn Fn(&mut NodeArena, &str, NodeId, NodeId) -> NodeId,
) -> NodeId {
    let mut exprs: Args = args.iter().copied().collect();

    if code == OpCode::Mul && exprs.len() >= 2 && arena.is_int(exprs[0], -1) {
        if let Some(neg) = &names.neg {
            let negated = unary(arena, neg, exprs[1]);
            exprs = std::iter::once(negated)
                .chain(exprs[2..].iter().copied())
                .collect();
        }
    }

    if code == OpCode::Add {
        let (mut ordered, negatives): (Args, Args) =
            exprs.iter().copied().partition(|&x| !arena.is_negative(x));
        ordered.extend(negatives);
        exprs = ordered;
    }

    let mut result = exprs[0];
    for &expr in &exprs[1..] {
        result = match &names.sub {
            Some(sub) if code == OpCode::Add && arena.is_negative(expr) => {
                let mut right = arena.op(OpCode::Neg, &[expr]);
                if let Some(ty) = arena.ty(expr).cloned() {
                    right = arena.with_type(right, ty);
                }
                binary(arena, sub, result, right)
            }
            _ => binary(arena, &names.op, result, expr),
        };
    }
    result
}
