//! Property-based tests for the rewrite engine.
//!
//! Random well-formed trees are generated and checked for:
//! 1. Stringify determinism and independence from spans and target types
//! 2. Flip involution for every binary code with a counterpart
//! 3. Arity preservation under every plugin in the catalog
//! 4. Mutating-infix synthesis for commutative self-reference

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::needless_pass_by_value,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use tern_ir::{is_well_formed, Node, NodeArena, NodeId, NodeKind, OpCode, Seq, Span, Type};
use tern_rewrite::{
    flip_binary_ops, print_int_to_print, AddIncAndDec, AddMutatingInfix, ArraysToLists,
    BackwardsIndexToForwards, FlipBinaryOps, MapUnaryAndBinary, MethodsAsFunctions,
    MutatingTargets, OperatorTable, PassRunner, Plugin, RemoveImplicitConversions, UseIndexCalls,
};

// -- Tree Generation --

const VARIABLES: [&str; 3] = ["x", "y", "xs"];

#[derive(Clone, Debug)]
enum Expr {
    Int(i64),
    Var(usize),
    Op(OpCode, Vec<Expr>),
    Assign(usize, Box<Expr>),
    Convert(Box<Expr>),
    Array(Vec<Expr>),
}

fn unary_code() -> impl Strategy<Value = OpCode> {
    prop::sample::select(vec![OpCode::Neg, OpCode::BitNot, OpCode::Not])
}

fn binary_code() -> impl Strategy<Value = OpCode> {
    prop::sample::select(vec![
        OpCode::Sub,
        OpCode::Div,
        OpCode::Lt,
        OpCode::Leq,
        OpCode::Gt,
        OpCode::Geq,
        OpCode::Eq,
        OpCode::Neq,
        OpCode::At(Seq::Array),
        OpCode::AtBack(Seq::List),
        OpCode::Contains(Seq::Array),
    ])
}

fn ternary_code() -> impl Strategy<Value = OpCode> {
    prop::sample::select(vec![
        OpCode::SetAt(Seq::List),
        OpCode::SetAtBack(Seq::List),
        OpCode::SliceBack(Seq::Codepoint),
    ])
}

fn variadic_code() -> impl Strategy<Value = OpCode> {
    prop::sample::select(vec![OpCode::Add, OpCode::Mul, OpCode::BitAnd, OpCode::Max])
}

fn expr_strategy() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        (-3i64..=3).prop_map(Expr::Int),
        (0..VARIABLES.len()).prop_map(Expr::Var),
    ];
    leaf.prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            (unary_code(), inner.clone()).prop_map(|(code, a)| Expr::Op(code, vec![a])),
            (binary_code(), inner.clone(), inner.clone())
                .prop_map(|(code, a, b)| Expr::Op(code, vec![a, b])),
            (ternary_code(), inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(code, a, b, c)| Expr::Op(code, vec![a, b, c])),
            (variadic_code(), prop::collection::vec(inner.clone(), 1..4))
                .prop_map(|(code, args)| Expr::Op(code, args)),
            (0..VARIABLES.len(), inner.clone())
                .prop_map(|(var, value)| Expr::Assign(var, Box::new(value))),
            inner.clone().prop_map(|e| Expr::Convert(Box::new(e))),
            prop::collection::vec(inner, 0..3).prop_map(Expr::Array),
        ]
    })
}

/// Allocate `expr`, giving every node a span derived from `span_base`.
fn build(arena: &mut NodeArena, expr: &Expr, span_base: u32) -> NodeId {
    let kind = match expr {
        Expr::Int(v) => NodeKind::Integer((*v).into()),
        Expr::Var(i) => NodeKind::Identifier(arena.intern(VARIABLES[*i])),
        Expr::Op(op, args) => {
            let args: Vec<NodeId> = args.iter().map(|a| build(arena, a, span_base)).collect();
            NodeKind::Op {
                op: *op,
                args: arena.push_list(&args),
            }
        }
        Expr::Assign(var, value) => {
            let variable = build(arena, &Expr::Var(*var), span_base);
            let expr = build(arena, value, span_base);
            NodeKind::Assignment { variable, expr }
        }
        Expr::Convert(inner) => NodeKind::ImplicitConversion(build(arena, inner, span_base)),
        Expr::Array(items) => {
            let items: Vec<NodeId> = items.iter().map(|a| build(arena, a, span_base)).collect();
            NodeKind::Array(arena.push_list(&items))
        }
    };
    let start = span_base + u32::try_from(arena.len()).unwrap();
    arena.push(Node::new(kind, Span::new(start, start + 1), None))
}

fn catalog() -> Vec<Box<dyn Plugin>> {
    let names: OperatorTable<String> = [
        (OpCode::Neg, "-"),
        (OpCode::Not, "not"),
        (OpCode::BitNot, "~"),
        (OpCode::Add, "+"),
        (OpCode::Sub, "-"),
        (OpCode::Mul, "*"),
        (OpCode::Div, "//"),
        (OpCode::Lt, "<"),
        (OpCode::Eq, "=="),
        (OpCode::BitAnd, "&"),
    ]
    .into_iter()
    .collect();
    let mutating: OperatorTable<String> = [(OpCode::Add, "+"), (OpCode::Sub, "-")]
        .into_iter()
        .collect();
    vec![
        Box::new(MapUnaryAndBinary::new(names, MutatingTargets::All).unwrap()),
        Box::new(AddMutatingInfix::new(mutating).unwrap()),
        Box::new(AddIncAndDec::new()),
        Box::new(BackwardsIndexToForwards::all(true)),
        Box::new(UseIndexCalls::defaults(true)),
        Box::new(FlipBinaryOps),
        Box::new(ArraysToLists),
        Box::new(print_int_to_print()),
        Box::new(RemoveImplicitConversions),
        Box::new(MethodsAsFunctions),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_stringify_is_deterministic(expr in expr_strategy()) {
        let mut arena = NodeArena::new();
        let id = build(&mut arena, &expr, 0);
        let first = arena.stringify(id, false);
        let second = arena.stringify(id, false);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_stringify_ignores_spans(expr in expr_strategy()) {
        let mut arena = NodeArena::new();
        let a = build(&mut arena, &expr, 0);
        let b = build(&mut arena, &expr, 10_000);
        prop_assert_ne!(arena.span(a), arena.span(b));
        prop_assert_eq!(arena.stringify(a, false), arena.stringify(b, false));
        prop_assert_eq!(arena.stringify(a, true), arena.stringify(b, true));
    }

    #[test]
    fn prop_skipping_type_ignores_type(expr in expr_strategy()) {
        let mut arena = NodeArena::new();
        let plain = build(&mut arena, &expr, 0);
        let typed = arena.with_type(plain, Type::int());
        prop_assert_eq!(arena.stringify(plain, true), arena.stringify(typed, true));
        prop_assert_ne!(arena.stringify(plain, false), arena.stringify(typed, false));
    }

    #[test]
    fn prop_flip_is_an_involution(
        code in prop::sample::select(vec![
            OpCode::Lt, OpCode::Leq, OpCode::Gt, OpCode::Geq, OpCode::Eq, OpCode::Neq,
        ]),
        left in expr_strategy(),
        right in expr_strategy(),
    ) {
        let mut arena = NodeArena::new();
        let left = build(&mut arena, &left, 0);
        let right = build(&mut arena, &right, 0);
        let original = arena.op(code, &[left, right]);

        let once = flip_binary_ops(&mut arena, original).unwrap();
        let twice = flip_binary_ops(&mut arena, once).unwrap();

        prop_assert_eq!(arena.stringify(twice, false), arena.stringify(original, false));
    }

    #[test]
    fn prop_every_plugin_preserves_arity(expr in expr_strategy()) {
        let mut arena = NodeArena::new();
        let root = build(&mut arena, &expr, 0);
        for plugin in catalog() {
            let name = plugin.name().to_owned();
            let result = PassRunner::new(vec![plugin]).run(&mut arena, root);
            prop_assert!(is_well_formed(&arena, result), "{} broke arity", name);
        }
    }

    #[test]
    fn prop_full_catalog_preserves_arity(expr in expr_strategy()) {
        let mut arena = NodeArena::new();
        let root = build(&mut arena, &expr, 0);
        let result = PassRunner::new(catalog()).run(&mut arena, root);
        prop_assert!(is_well_formed(&arena, result));
    }

    #[test]
    fn prop_commutative_self_reference_becomes_mutating(other in expr_strategy()) {
        let mut arena = NodeArena::new();
        let x = arena.ident("x");
        let y = build(&mut arena, &other, 0);
        let sum = arena.op(OpCode::Add, &[y, x]);
        let assign = arena.assignment(x, sum);
        let plugin = AddMutatingInfix::new([(OpCode::Add, "+")].into_iter().collect()).unwrap();

        let got = plugin.visit(&mut arena, &tern_ir::Spine::root(assign)).unwrap();

        let expected = arena.mutating_infix("+", x, y);
        prop_assert_eq!(arena.stringify(got, false), arena.stringify(expected, false));
    }
}
