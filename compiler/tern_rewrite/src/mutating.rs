//! Mutating-assignment synthesis.
//!
//! `a = a op b` becomes `a op= b`, and `a += 1` may further become `a++`.
//! The match is local to one assignment: the variable is found among the
//! op's operands by canonical string, and only the first match is removed.
//! `x = x + x` therefore becomes `x += x`.

use tern_ir::{NodeArena, NodeId, NodeKind, OpCode, Spine};

use crate::map_ops::{Args, OperatorTable};
use crate::{ConfigError, Plugin};

/// Plugin rewriting `a = a op b` into `MutatingInfix(name, a, b)`.
///
/// The table maps binary or variadic codes to the target operator symbol
/// without the trailing `=`.
pub struct AddMutatingInfix {
    name: String,
    table: OperatorTable<String>,
}

impl AddMutatingInfix {
    /// # Errors
    /// Returns [`ConfigError::UnsupportedArity`] for a unary or ternary code.
    pub fn new(table: OperatorTable<String>) -> Result<Self, ConfigError> {
        if let Some((code, _)) = table.iter().find(|(code, _)| !code.is_chainable()) {
            return Err(ConfigError::UnsupportedArity {
                code,
                arity: code.arity(),
                expected: "binary or variadic",
            });
        }
        Ok(Self {
            name: format!("add_mutating_infix({table})"),
            table,
        })
    }
}

impl Plugin for AddMutatingInfix {
    fn name(&self) -> &str {
        &self.name
    }

    fn visit(&self, arena: &mut NodeArena, spine: &Spine<'_>) -> Option<NodeId> {
        let &NodeKind::Assignment { variable, expr } = arena.kind(spine.node()) else {
            return None;
        };
        let (code, args) = arena.op_args(expr)?;
        if args.len() < 2 {
            return None;
        }
        let name = self.table.get(code)?;
        let args: Args = args.iter().copied().collect();

        let target = arena.stringify(variable, false);
        let index = args
            .iter()
            .position(|&arg| arena.stringify(arg, false) == target)?;
        if index > 0 && !code.is_commutative() {
            return None;
        }

        let rest: Args = args
            .iter()
            .enumerate()
            .filter_map(|(i, &arg)| (i != index).then_some(arg))
            .collect();

        if code == OpCode::Add {
            if let Some(sub) = self.table.get(OpCode::Sub) {
                if rest.iter().all(|&arg| arena.is_negative(arg)) {
                    let sum = combine(arena, OpCode::Add, &rest);
                    let right = arena.op(OpCode::Neg, &[sum]);
                    return Some(arena.mutating_infix(sub, variable, right));
                }
            }
        }
        let right = combine(arena, code, &rest);
        Some(arena.mutating_infix(name, variable, right))
    }
}

/// The sole operand, or the operands under `code`.
fn combine(arena: &mut NodeArena, code: OpCode, operands: &[NodeId]) -> NodeId {
    match operands {
        [single] => *single,
        _ => arena.op(code, operands),
    }
}

/// Rewrites a `variable` + `operator` pair into a replacement node.
pub type IncDecFn = Box<dyn Fn(&mut NodeArena, &str, NodeId) -> NodeId>;

/// Plugin rewriting `x += 1` and `x -= 1`.
///
/// The default transform doubles the operator into a postfix node
/// (`x++`, `x--`).
pub struct AddIncAndDec {
    name: String,
    transform: IncDecFn,
}

impl AddIncAndDec {
    pub fn new() -> Self {
        Self::with_transform("postfix", |arena, op, variable| {
            let doubled = op.repeat(2);
            arena.postfix(&doubled, variable)
        })
    }

    /// Use `transform(arena, "+" | "-", variable)` instead of the postfix
    /// default. `label` names the transform in the plugin name.
    pub fn with_transform<F>(label: &str, transform: F) -> Self
    where
        F: Fn(&mut NodeArena, &str, NodeId) -> NodeId + 'static,
    {
        Self {
            name: format!("add_inc_and_dec({label})"),
            transform: Box::new(transform),
        }
    }
}

impl Default for AddIncAndDec {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for AddIncAndDec {
    fn name(&self) -> &str {
        &self.name
    }

    fn visit(&self, arena: &mut NodeArena, spine: &Spine<'_>) -> Option<NodeId> {
        let &NodeKind::MutatingInfix {
            name,
            variable,
            right,
        } = arena.kind(spine.node())
        else {
            return None;
        };
        let op = match arena.name(name) {
            "+" => "+",
            "-" => "-",
            _ => return None,
        };
        if !arena.is_int(right, 1) {
            return None;
        }
        Some((self.transform)(arena, op, variable))
    }
}

#[cfg(test)]
mod tests;
