use pretty_assertions::assert_eq;
use tern_ir::{NodeArena, NodeId, OpCode, Spine, Type};

use super::{AddIncAndDec, AddMutatingInfix};
use crate::{ConfigError, OperatorTable, Plugin};

fn visit(plugin: &dyn Plugin, arena: &mut NodeArena, id: NodeId) -> Option<NodeId> {
    plugin.visit(arena, &Spine::root(id))
}

fn rendered(arena: &NodeArena, id: Option<NodeId>) -> Option<String> {
    id.map(|id| arena.stringify(id, false).to_string())
}

fn plus_minus() -> AddMutatingInfix {
    let table = [(OpCode::Add, "+"), (OpCode::Sub, "-"), (OpCode::Mul, "*")]
        .into_iter()
        .collect();
    match AddMutatingInfix::new(table) {
        Ok(plugin) => plugin,
        Err(e) => panic!("{e}"),
    }
}

#[test]
fn variable_first_becomes_mutating_infix() {
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let y = arena.ident("y");
    let sum = arena.op(OpCode::Add, &[x, y]);
    let assign = arena.assignment(x, sum);

    let got = visit(&plus_minus(), &mut arena, assign);

    let expected = arena.mutating_infix("+", x, y);
    assert_eq!(rendered(&arena, got), rendered(&arena, Some(expected)));
}

#[test]
fn commutative_op_may_match_later_operand() {
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let y = arena.ident("y");
    let sum = arena.op(OpCode::Add, &[y, x]);
    let assign = arena.assignment(x, sum);

    let got = visit(&plus_minus(), &mut arena, assign);

    let expected = arena.mutating_infix("+", x, y);
    assert_eq!(rendered(&arena, got), rendered(&arena, Some(expected)));
}

#[test]
fn non_commutative_op_requires_variable_first() {
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let y = arena.ident("y");
    let diff = arena.op(OpCode::Sub, &[y, x]);
    let assign = arena.assignment(x, diff);

    assert_eq!(visit(&plus_minus(), &mut arena, assign), None);
}

#[test]
fn matches_by_structure_not_identity() {
    let mut arena = NodeArena::new();
    let target = arena.ident("x");
    let operand = arena.ident("x");
    let y = arena.ident("y");
    let diff = arena.op(OpCode::Sub, &[operand, y]);
    let assign = arena.assignment(target, diff);

    let got = visit(&plus_minus(), &mut arena, assign);

    let expected = arena.mutating_infix("-", target, y);
    assert_eq!(rendered(&arena, got), rendered(&arena, Some(expected)));
}

#[test]
fn target_type_takes_part_in_the_match() {
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let typed = arena.ident("x");
    let typed = arena.with_type(typed, Type::int());
    let y = arena.ident("y");
    let sum = arena.op(OpCode::Add, &[typed, y]);
    let assign = arena.assignment(x, sum);

    assert_eq!(visit(&plus_minus(), &mut arena, assign), None);
}

#[test]
fn remaining_operands_keep_the_op() {
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let y = arena.ident("y");
    let z = arena.ident("z");
    let product = arena.op(OpCode::Mul, &[y, x, z]);
    let assign = arena.assignment(x, product);

    let got = visit(&plus_minus(), &mut arena, assign);

    let rest = arena.op(OpCode::Mul, &[y, z]);
    let expected = arena.mutating_infix("*", x, rest);
    assert_eq!(rendered(&arena, got), rendered(&arena, Some(expected)));
}

#[test]
fn all_negative_remainder_becomes_subtraction() {
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let three = arena.int(-3);
    let sum = arena.op(OpCode::Add, &[x, three]);
    let assign = arena.assignment(x, sum);

    let got = visit(&plus_minus(), &mut arena, assign);

    let three = arena.int(3);
    let expected = arena.mutating_infix("-", x, three);
    assert_eq!(rendered(&arena, got), rendered(&arena, Some(expected)));
}

#[test]
fn several_negative_operands_are_summed_then_negated() {
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let y = arena.ident("y");
    let z = arena.ident("z");
    let neg_y = arena.op(OpCode::Neg, &[y]);
    let neg_z = arena.op(OpCode::Neg, &[z]);
    let sum = arena.op(OpCode::Add, &[x, neg_y, neg_z]);
    let assign = arena.assignment(x, sum);

    let got = visit(&plus_minus(), &mut arena, assign);

    let rest = arena.op(OpCode::Add, &[neg_y, neg_z]);
    let negated = arena.op(OpCode::Neg, &[rest]);
    let expected = arena.mutating_infix("-", x, negated);
    assert_eq!(rendered(&arena, got), rendered(&arena, Some(expected)));
}

#[test]
fn without_sub_negative_operands_stay_additions() {
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let three = arena.int(-3);
    let sum = arena.op(OpCode::Add, &[x, three]);
    let assign = arena.assignment(x, sum);
    let plugin = match AddMutatingInfix::new([(OpCode::Add, "+")].into_iter().collect()) {
        Ok(plugin) => plugin,
        Err(e) => panic!("{e}"),
    };

    let got = visit(&plugin, &mut arena, assign);

    let expected = arena.mutating_infix("+", x, three);
    assert_eq!(rendered(&arena, got), rendered(&arena, Some(expected)));
}

#[test]
fn only_first_self_reference_is_removed() {
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let sum = arena.op(OpCode::Add, &[x, x]);
    let assign = arena.assignment(x, sum);

    let got = visit(&plus_minus(), &mut arena, assign);

    let expected = arena.mutating_infix("+", x, x);
    assert_eq!(rendered(&arena, got), rendered(&arena, Some(expected)));
}

#[test]
fn single_operand_and_unmapped_codes_are_ignored() {
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let y = arena.ident("y");
    let single = arena.op(OpCode::Add, &[x]);
    let assign_single = arena.assignment(x, single);
    let quotient = arena.op(OpCode::Div, &[x, y]);
    let assign_div = arena.assignment(x, quotient);

    assert_eq!(visit(&plus_minus(), &mut arena, assign_single), None);
    assert_eq!(visit(&plus_minus(), &mut arena, assign_div), None);
}

#[test]
fn unary_codes_are_rejected() {
    let table: OperatorTable<String> = [(OpCode::Neg, "-")].into_iter().collect();
    assert!(matches!(
        AddMutatingInfix::new(table),
        Err(ConfigError::UnsupportedArity {
            code: OpCode::Neg,
            ..
        })
    ));
}

#[test]
fn increment_and_decrement_use_doubled_postfix() {
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let one = arena.int(1);
    let inc = arena.mutating_infix("+", x, one);
    let dec = arena.mutating_infix("-", x, one);
    let plugin = AddIncAndDec::new();

    let got_inc = visit(&plugin, &mut arena, inc);
    let got_dec = visit(&plugin, &mut arena, dec);

    let plus_plus = arena.postfix("++", x);
    let minus_minus = arena.postfix("--", x);
    assert_eq!(rendered(&arena, got_inc), rendered(&arena, Some(plus_plus)));
    assert_eq!(rendered(&arena, got_dec), rendered(&arena, Some(minus_minus)));
}

#[test]
fn inc_and_dec_require_literal_one() {
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let two = arena.int(2);
    let one = arena.int(1);
    let by_two = arena.mutating_infix("+", x, two);
    let times_one = arena.mutating_infix("*", x, one);
    let plugin = AddIncAndDec::new();

    assert_eq!(visit(&plugin, &mut arena, by_two), None);
    assert_eq!(visit(&plugin, &mut arena, times_one), None);
}

#[test]
fn custom_transform_is_named_and_applied() {
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let one = arena.int(1);
    let inc = arena.mutating_infix("+", x, one);
    let plugin = AddIncAndDec::with_transform("prefix", |arena, op, variable| {
        let doubled = op.repeat(2);
        arena.prefix(&doubled, variable)
    });

    let got = visit(&plugin, &mut arena, inc);

    let expected = arena.prefix("++", x);
    assert_eq!(plugin.name(), "add_inc_and_dec(prefix)");
    assert_eq!(rendered(&arena, got), rendered(&arena, Some(expected)));
}
