use pretty_assertions::assert_eq;
use tern_ir::{NodeArena, NodeId, OpCode, PrintKind, Seq, Spine};

use super::{
    flip_binary_ops, print_int_to_print, ArraysToLists, FlipBinaryOps, MethodsAsFunctions,
    RemoveImplicitConversions,
};
use crate::Plugin;

fn visit(plugin: &dyn Plugin, arena: &mut NodeArena, id: NodeId) -> Option<NodeId> {
    plugin.visit(arena, &Spine::root(id))
}

fn rendered(arena: &NodeArena, id: Option<NodeId>) -> Option<String> {
    id.map(|id| arena.stringify(id, false).to_string())
}

#[test]
fn flip_uses_counterpart_code() {
    let mut arena = NodeArena::new();
    let a = arena.ident("a");
    let b = arena.ident("b");
    let greater = arena.op(OpCode::Gt, &[a, b]);

    let got = flip_binary_ops(&mut arena, greater);

    let expected = arena.op(OpCode::Lt, &[b, a]);
    assert_eq!(rendered(&arena, got), rendered(&arena, Some(expected)));
}

#[test]
fn flip_swaps_commutative_operands() {
    let mut arena = NodeArena::new();
    let a = arena.ident("a");
    let b = arena.ident("b");
    let equal = arena.op(OpCode::Eq, &[a, b]);

    let got = flip_binary_ops(&mut arena, equal);

    let expected = arena.op(OpCode::Eq, &[b, a]);
    assert_eq!(rendered(&arena, got), rendered(&arena, Some(expected)));
}

#[test]
fn flip_ignores_other_ops() {
    let mut arena = NodeArena::new();
    let a = arena.ident("a");
    let b = arena.ident("b");
    let diff = arena.op(OpCode::Sub, &[a, b]);
    let sum = arena.op(OpCode::Add, &[a, b]);

    assert_eq!(flip_binary_ops(&mut arena, diff), None);
    assert_eq!(flip_binary_ops(&mut arena, sum), None);
    assert_eq!(flip_binary_ops(&mut arena, a), None);
}

#[test]
fn flip_twice_is_identity() {
    let mut arena = NodeArena::new();
    let a = arena.ident("a");
    let b = arena.ident("b");
    let leq = arena.op(OpCode::Leq, &[a, b]);

    let once = visit(&FlipBinaryOps, &mut arena, leq);
    let twice = once.and_then(|id| visit(&FlipBinaryOps, &mut arena, id));

    assert_eq!(rendered(&arena, twice), rendered(&arena, Some(leq)));
}

#[test]
fn nested_implicit_conversions_are_unwrapped() {
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let inner = arena.implicit_conversion(x);
    let outer = arena.implicit_conversion(inner);

    assert_eq!(visit(&RemoveImplicitConversions, &mut arena, outer), Some(x));
    assert_eq!(visit(&RemoveImplicitConversions, &mut arena, x), None);
}

#[test]
fn method_call_becomes_function_of_property() {
    let mut arena = NodeArena::new();
    let s = arena.ident("s");
    let sep = arena.text(",");
    let call = arena.method_call(s, "split", &[sep]);

    let got = visit(&MethodsAsFunctions, &mut arena, call);

    let property = arena.property_call(s, "split");
    let expected = arena.function_call(property, &[sep]);
    assert_eq!(rendered(&arena, got), rendered(&arena, Some(expected)));
}

#[test]
fn contains_on_array_literal_becomes_list() {
    let mut arena = NodeArena::new();
    let one = arena.int(1);
    let two = arena.int(2);
    let three = arena.int(3);
    let array = arena.array(&[one, two, three]);
    let contains = arena.op(OpCode::Contains(Seq::Array), &[array, two]);

    let got_op = visit(&ArraysToLists, &mut arena, contains);
    let got_literal = visit(&ArraysToLists, &mut arena, array);

    let list = arena.list_literal(&[one, two, three]);
    let expected_op = arena.op(OpCode::Contains(Seq::List), &[array, two]);
    assert_eq!(rendered(&arena, got_op), rendered(&arena, Some(expected_op)));
    assert_eq!(rendered(&arena, got_literal), rendered(&arena, Some(list)));
}

#[test]
fn arrays_to_lists_ignores_other_codes() {
    let mut arena = NodeArena::new();
    let xs = arena.ident("xs");
    let size = arena.op(OpCode::Size(Seq::Array), &[xs]);

    assert_eq!(visit(&ArraysToLists, &mut arena, size), None);
}

#[test]
fn print_int_goes_through_text() {
    let mut arena = NodeArena::new();
    let n = arena.ident("n");
    let print = arena.op(OpCode::Println(PrintKind::Int), &[n]);

    let got = visit(&print_int_to_print(), &mut arena, print);

    let text = arena.op(OpCode::IntToDec, &[n]);
    let expected = arena.op(OpCode::Println(PrintKind::Text), &[text]);
    assert_eq!(rendered(&arena, got), rendered(&arena, Some(expected)));
}
