//! Small canonicalization rewrites.

use tern_ir::{NodeArena, NodeId, NodeKind, OpCode, PrintKind, Seq, Spine};

use crate::map_ops::{map_ops, Args, MapOps, OpTransform};
use crate::Plugin;

/// Swap the arguments of a binary op.
///
/// A code with a flipped counterpart is replaced by it (`a < b` → `b > a`);
/// a commutative code keeps its code. Anything else returns `None`.
pub fn flip_binary_ops(arena: &mut NodeArena, id: NodeId) -> Option<NodeId> {
    let (code, args) = arena.op_args(id)?;
    if !code.is_binary() {
        return None;
    }
    let &[left, right] = args else {
        return None;
    };
    if let Some(flipped) = code.flipped() {
        return Some(arena.op(flipped, &[right, left]));
    }
    if code.is_commutative() {
        return Some(arena.op(code, &[right, left]));
    }
    None
}

/// [`flip_binary_ops`] as a plugin.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlipBinaryOps;

impl Plugin for FlipBinaryOps {
    fn name(&self) -> &str {
        "flip_binary_ops"
    }

    fn bakes_type(&self) -> bool {
        true
    }

    fn visit(&self, arena: &mut NodeArena, spine: &Spine<'_>) -> Option<NodeId> {
        flip_binary_ops(arena, spine.node())
    }
}

/// Unwraps `ImplicitConversion` wrappers down to the first other node.
#[derive(Clone, Copy, Debug, Default)]
pub struct RemoveImplicitConversions;

impl Plugin for RemoveImplicitConversions {
    fn name(&self) -> &str {
        "remove_implicit_conversions"
    }

    fn bakes_type(&self) -> bool {
        true
    }

    fn visit(&self, arena: &mut NodeArena, spine: &Spine<'_>) -> Option<NodeId> {
        let NodeKind::ImplicitConversion(mut inner) = *arena.kind(spine.node()) else {
            return None;
        };
        while let NodeKind::ImplicitConversion(next) = *arena.kind(inner) {
            inner = next;
        }
        Some(inner)
    }
}

/// `obj.f(args)` → `(obj.f)(args)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MethodsAsFunctions;

impl Plugin for MethodsAsFunctions {
    fn name(&self) -> &str {
        "methods_as_functions"
    }

    fn bakes_type(&self) -> bool {
        true
    }

    fn visit(&self, arena: &mut NodeArena, spine: &Spine<'_>) -> Option<NodeId> {
        let NodeKind::MethodCall {
            object,
            ident,
            args,
        } = *arena.kind(spine.node())
        else {
            return None;
        };
        let args: Args = arena.list(args).iter().copied().collect();
        let property = arena.alloc(NodeKind::PropertyCall { object, ident });
        Some(arena.function_call(property, &args))
    }
}

/// Array literals become list literals; array `at`, `set_at` and
/// `contains` become their list forms.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArraysToLists;

impl Plugin for ArraysToLists {
    fn name(&self) -> &str {
        "arrays_to_lists"
    }

    fn bakes_type(&self) -> bool {
        true
    }

    fn visit(&self, arena: &mut NodeArena, spine: &Spine<'_>) -> Option<NodeId> {
        let id = spine.node();
        if let NodeKind::Array(exprs) = *arena.kind(id) {
            return Some(arena.alloc(NodeKind::List(exprs)));
        }
        let (code, args) = arena.op_args(id)?;
        let code = match code {
            OpCode::At(Seq::Array) => OpCode::At(Seq::List),
            OpCode::SetAt(Seq::Array) => OpCode::SetAt(Seq::List),
            OpCode::Contains(Seq::Array) => OpCode::Contains(Seq::List),
            _ => return None,
        };
        let args: Args = args.iter().copied().collect();
        Some(arena.op(code, &args))
    }
}

/// `print[Int](x)` → `print[Text](int_to_dec(x))`, likewise `println`.
pub fn print_int_to_print() -> MapOps {
    let via_text = |print: OpCode| {
        OpTransform::build(move |arena, args, _| {
            let text = arena.op(OpCode::IntToDec, args);
            Some(arena.op(print, &[text]))
        })
    };
    map_ops(
        "print_int_to_print",
        [
            (OpCode::Print(PrintKind::Int), via_text(OpCode::Print(PrintKind::Text))),
            (
                OpCode::Println(PrintKind::Int),
                via_text(OpCode::Println(PrintKind::Text)),
            ),
        ],
    )
}

#[cfg(test)]
mod tests;
