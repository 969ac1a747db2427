//! Canonical stringification.
//!
//! The single mechanism for structural equality: two subtrees denote the
//! same value iff their canonical strings are equal. The format is total and
//! order-preserving:
//!
//! ```text
//! Op{op:add,args:[Identifier{name:"x"},Integer{value:5n}]}:int[0..5]
//! ```
//!
//! - spans are never emitted
//! - the target type is appended as `:<type>` unless `skip_target_type`
//! - integer literals end in `n`, names are escaped string literals
//!
//! # Cache
//!
//! Results are memoized per `(NodeId, skip_target_type)`. Nodes are
//! append-only, so an entry is written once and never invalidated; two
//! structurally identical nodes get independent entries.
//!
//! Only the node passed to [`NodeArena::stringify`] is memoized. Children
//! reuse an existing entry when there is one and are otherwise written
//! inline, so a deep chain costs one string rather than one per level.

use std::fmt::Write as _;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use tern_stack::ensure_sufficient_stack;

use crate::{Name, NodeArena, NodeId, NodeKind, NodeRange};

/// Memo table for canonical strings.
#[derive(Clone, Debug, Default)]
pub struct StringifyCache {
    entries: FxHashMap<(NodeId, bool), Rc<str>>,
}

impl StringifyCache {
    fn get(&self, id: NodeId, skip_target_type: bool) -> Option<Rc<str>> {
        self.entries.get(&(id, skip_target_type)).cloned()
    }

    fn insert(&mut self, id: NodeId, skip_target_type: bool, s: Rc<str>) {
        self.entries.insert((id, skip_target_type), s);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NodeArena {
    /// Canonical string of the subtree rooted at `id`.
    pub fn stringify(&self, id: NodeId, skip_target_type: bool) -> Rc<str> {
        if let Some(s) = self.stringified.borrow().get(id, skip_target_type) {
            return s;
        }
        let mut out = String::new();
        self.write_node(id, skip_target_type, &mut out);
        let s: Rc<str> = out.into();
        self.stringified
            .borrow_mut()
            .insert(id, skip_target_type, Rc::clone(&s));
        s
    }

    /// Number of memoized strings.
    pub fn stringify_cache_len(&self) -> usize {
        self.stringified.borrow().len()
    }

    /// Drop cache entries for nodes unreachable from `roots`.
    pub fn prune_stringify_cache(&mut self, roots: &[NodeId]) {
        let mut live = FxHashSet::default();
        let mut stack: Vec<NodeId> = roots.to_vec();
        while let Some(id) = stack.pop() {
            if live.insert(id) {
                stack.extend(self.children(id));
            }
        }
        self.stringified
            .get_mut()
            .entries
            .retain(|(id, _), _| live.contains(id));
    }

    fn write_node(&self, id: NodeId, skip: bool, out: &mut String) {
        ensure_sufficient_stack(|| self.write_node_inner(id, skip, out));
    }

    fn write_node_inner(&self, id: NodeId, skip: bool, out: &mut String) {
        let kind = self.kind(id);
        out.push_str(kind.tag());
        out.push('{');
        match kind {
            NodeKind::Op { op, args } => {
                let _ = write!(out, "op:{op},");
                self.write_list("args", *args, skip, out);
            }
            NodeKind::Identifier(name) => self.write_name("name", *name, out),
            NodeKind::Integer(v) => {
                let _ = write!(out, "value:{v}n");
            }
            NodeKind::Text(value) => self.write_name("value", *value, out),
            NodeKind::Builtin(name) => self.write_name("name", *name, out),
            NodeKind::Assignment { variable, expr } => {
                self.write_child("variable", *variable, skip, out);
                out.push(',');
                self.write_child("expr", *expr, skip, out);
            }
            NodeKind::Block(children) => self.write_list("children", *children, skip, out),
            NodeKind::MutatingInfix {
                name,
                variable,
                right,
            } => {
                self.write_name("name", *name, out);
                out.push(',');
                self.write_child("variable", *variable, skip, out);
                out.push(',');
                self.write_child("right", *right, skip, out);
            }
            NodeKind::Infix { name, left, right } => {
                self.write_name("name", *name, out);
                out.push(',');
                self.write_child("left", *left, skip, out);
                out.push(',');
                self.write_child("right", *right, skip, out);
            }
            NodeKind::Prefix { name, arg } | NodeKind::Postfix { name, arg } => {
                self.write_name("name", *name, out);
                out.push(',');
                self.write_child("arg", *arg, skip, out);
            }
            NodeKind::IndexCall { collection, index } => {
                self.write_child("collection", *collection, skip, out);
                out.push(',');
                self.write_child("index", *index, skip, out);
            }
            NodeKind::FunctionCall { func, args } => {
                self.write_child("func", *func, skip, out);
                out.push(',');
                self.write_list("args", *args, skip, out);
            }
            NodeKind::MethodCall {
                object,
                ident,
                args,
            } => {
                self.write_child("object", *object, skip, out);
                out.push(',');
                self.write_name("ident", *ident, out);
                out.push(',');
                self.write_list("args", *args, skip, out);
            }
            NodeKind::PropertyCall { object, ident } => {
                self.write_child("object", *object, skip, out);
                out.push(',');
                self.write_name("ident", *ident, out);
            }
            NodeKind::ImplicitConversion(expr) => self.write_child("expr", *expr, skip, out),
            NodeKind::Array(exprs) | NodeKind::List(exprs) => {
                self.write_list("exprs", *exprs, skip, out);
            }
        }
        out.push('}');
        if !skip {
            if let Some(ty) = self.ty(id) {
                let _ = write!(out, ":{ty}");
            }
        }
    }

    fn write_name(&self, field: &str, name: Name, out: &mut String) {
        let _ = write!(out, "{field}:{:?}", self.name(name));
    }

    fn write_child(&self, field: &str, child: NodeId, skip: bool, out: &mut String) {
        out.push_str(field);
        out.push(':');
        self.write_nested(child, skip, out);
    }

    fn write_nested(&self, id: NodeId, skip: bool, out: &mut String) {
        let cached = self.stringified.borrow().get(id, skip);
        match cached {
            Some(s) => out.push_str(&s),
            None => self.write_node(id, skip, out),
        }
    }

    fn write_list(&self, field: &str, range: NodeRange, skip: bool, out: &mut String) {
        out.push_str(field);
        out.push_str(":[");
        for (i, &child) in self.list(range).iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.write_nested(child, skip, out);
        }
        out.push(']');
    }
}
