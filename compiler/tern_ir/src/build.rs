//! Node constructors and predicates.
//!
//! Constructors allocate synthetic nodes (dummy span, no type). `op` is the
//! only constructor that inspects op-code metadata: it enforces the arity
//! invariant and routes `neg` through [`NodeArena::negate`].

use num_bigint::BigInt;
use num_traits::{One, Signed};

use crate::{NodeArena, NodeId, NodeKind, OpCode};

impl NodeArena {
    /// Build an `Op` node.
    ///
    /// `neg` is folded (see [`negate`](Self::negate)); everything else is
    /// allocated as given.
    ///
    /// # Panics
    /// Panics if `args.len()` does not fit `code.arity()`.
    pub fn op(&mut self, code: OpCode, args: &[NodeId]) -> NodeId {
        assert!(
            code.arity().accepts(args.len()),
            "{} op `{code}` built with {} argument(s)",
            code.arity(),
            args.len(),
        );
        if code == OpCode::Neg {
            return self.negate(args[0]);
        }
        let args = self.push_list(args);
        self.alloc(NodeKind::Op { op: code, args })
    }

    /// Negate `x`, folding where the result stays a single node:
    ///
    /// - integer literal `v` → `-v`
    /// - `neg(y)` → `y`
    /// - `mul(-1, y)` → `y`, `mul(k, ...)` → `mul(-k, ...)`
    pub fn negate(&mut self, x: NodeId) -> NodeId {
        match self.kind(x) {
            NodeKind::Integer(v) => {
                let v = -v;
                return self.int(v);
            }
            NodeKind::Op {
                op: OpCode::Neg,
                args,
            } => return self.list(*args)[0],
            NodeKind::Op {
                op: OpCode::Mul,
                args,
            } => {
                let args: Vec<NodeId> = self.list(*args).to_vec();
                if let Some(k) = self.int_value(args[0]) {
                    let k = -k;
                    if args.len() == 1 {
                        return self.int(k);
                    }
                    if k.is_one() {
                        return if args.len() == 2 {
                            args[1]
                        } else {
                            self.op(OpCode::Mul, &args[1..])
                        };
                    }
                    let mut folded = args;
                    folded[0] = self.int(k);
                    return self.op(OpCode::Mul, &folded);
                }
            }
            _ => {}
        }
        let args = self.push_list(&[x]);
        self.alloc(NodeKind::Op {
            op: OpCode::Neg,
            args,
        })
    }

    /// `x + 1`, folded for integer literals.
    pub fn add1(&mut self, x: NodeId) -> NodeId {
        if let Some(v) = self.int_value(x) {
            let v = v + BigInt::one();
            return self.int(v);
        }
        let one = self.int(1);
        self.op(OpCode::Add, &[x, one])
    }

    pub fn int(&mut self, value: impl Into<BigInt>) -> NodeId {
        self.alloc(NodeKind::Integer(value.into()))
    }

    pub fn ident(&mut self, name: &str) -> NodeId {
        let name = self.intern(name);
        self.alloc(NodeKind::Identifier(name))
    }

    pub fn text(&mut self, value: &str) -> NodeId {
        let value = self.intern(value);
        self.alloc(NodeKind::Text(value))
    }

    pub fn builtin(&mut self, name: &str) -> NodeId {
        let name = self.intern(name);
        self.alloc(NodeKind::Builtin(name))
    }

    pub fn assignment(&mut self, variable: NodeId, expr: NodeId) -> NodeId {
        self.alloc(NodeKind::Assignment { variable, expr })
    }

    pub fn block(&mut self, stmts: &[NodeId]) -> NodeId {
        let stmts = self.push_list(stmts);
        self.alloc(NodeKind::Block(stmts))
    }

    /// `variable name= right`; `name` is the operator without the `=`.
    pub fn mutating_infix(&mut self, name: &str, variable: NodeId, right: NodeId) -> NodeId {
        let name = self.intern(name);
        self.alloc(NodeKind::MutatingInfix {
            name,
            variable,
            right,
        })
    }

    pub fn infix(&mut self, name: &str, left: NodeId, right: NodeId) -> NodeId {
        let name = self.intern(name);
        self.alloc(NodeKind::Infix { name, left, right })
    }

    pub fn prefix(&mut self, name: &str, arg: NodeId) -> NodeId {
        let name = self.intern(name);
        self.alloc(NodeKind::Prefix { name, arg })
    }

    pub fn postfix(&mut self, name: &str, arg: NodeId) -> NodeId {
        let name = self.intern(name);
        self.alloc(NodeKind::Postfix { name, arg })
    }

    pub fn index_call(&mut self, collection: NodeId, index: NodeId) -> NodeId {
        self.alloc(NodeKind::IndexCall { collection, index })
    }

    pub fn function_call(&mut self, func: NodeId, args: &[NodeId]) -> NodeId {
        let args = self.push_list(args);
        self.alloc(NodeKind::FunctionCall { func, args })
    }

    pub fn method_call(&mut self, object: NodeId, ident: &str, args: &[NodeId]) -> NodeId {
        let ident = self.intern(ident);
        let args = self.push_list(args);
        self.alloc(NodeKind::MethodCall {
            object,
            ident,
            args,
        })
    }

    pub fn property_call(&mut self, object: NodeId, ident: &str) -> NodeId {
        let ident = self.intern(ident);
        self.alloc(NodeKind::PropertyCall { object, ident })
    }

    pub fn implicit_conversion(&mut self, expr: NodeId) -> NodeId {
        self.alloc(NodeKind::ImplicitConversion(expr))
    }

    pub fn array(&mut self, exprs: &[NodeId]) -> NodeId {
        let exprs = self.push_list(exprs);
        self.alloc(NodeKind::Array(exprs))
    }

    pub fn list_literal(&mut self, exprs: &[NodeId]) -> NodeId {
        let exprs = self.push_list(exprs);
        self.alloc(NodeKind::List(exprs))
    }

    // Predicates

    pub fn is_ident(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Identifier(_))
    }

    /// Value of an integer literal.
    pub fn int_value(&self, id: NodeId) -> Option<&BigInt> {
        match self.kind(id) {
            NodeKind::Integer(v) => Some(v),
            _ => None,
        }
    }

    /// Returns `true` if `id` is the integer literal `n`.
    pub fn is_int(&self, id: NodeId, n: i64) -> bool {
        self.int_value(id).is_some_and(|v| *v == BigInt::from(n))
    }

    /// Op code of an `Op` node.
    pub fn op_code(&self, id: NodeId) -> Option<OpCode> {
        match self.kind(id) {
            NodeKind::Op { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Arguments of an `Op` node.
    pub fn op_args(&self, id: NodeId) -> Option<(OpCode, &[NodeId])> {
        match self.kind(id) {
            NodeKind::Op { op, args } => Some((*op, self.list(*args))),
            _ => None,
        }
    }

    /// Returns `true` if `id` reads as a negative quantity: a negative integer
    /// literal, a `neg` op, or a product led by a negative literal.
    pub fn is_negative(&self, id: NodeId) -> bool {
        match self.kind(id) {
            NodeKind::Integer(v) => v.is_negative(),
            NodeKind::Op {
                op: OpCode::Neg, ..
            } => true,
            NodeKind::Op {
                op: OpCode::Mul,
                args,
            } => self
                .int_value(self.list(*args)[0])
                .is_some_and(Signed::is_negative),
            _ => false,
        }
    }
}
