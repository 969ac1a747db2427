//! Reference pass driver.
//!
//! Applies a fixed plugin list to every node reachable from a root, in
//! pre-order: a node is offered to the plugins before its children, so an
//! `Assignment` is seen whole before its right-hand side is lowered. The
//! first plugin that returns a replacement wins.
//!
//! The tree is rebuilt copy-on-write. A parent gets a new node only if one
//! of its children changed; untouched subtrees keep their ids.
//!
//! In debug builds every node the walk reaches is arity-checked, so each
//! node a plugin builds is checked once, when the walk descends into it.

use tern_ir::{validate_node, NodeArena, NodeId, Spine};
use tern_stack::ensure_sufficient_stack;

use crate::Plugin;

/// How often a position is offered to the plugins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Traversal {
    /// At most one replacement per position.
    #[default]
    SinglePass,
    /// Re-offer a replaced position until no plugin applies.
    FixPoint,
}

/// Default bound on replacements at one position under [`Traversal::FixPoint`].
///
/// A position may be rewritten exactly this many times; needing one more
/// rewrite is a failure.
pub const DEFAULT_REWRITE_LIMIT: usize = 64;

/// Runs a list of plugins over a tree.
pub struct PassRunner {
    plugins: Vec<Box<dyn Plugin>>,
    traversal: Traversal,
    rewrite_limit: usize,
}

impl PassRunner {
    pub fn new(plugins: Vec<Box<dyn Plugin>>) -> Self {
        Self {
            plugins,
            traversal: Traversal::default(),
            rewrite_limit: DEFAULT_REWRITE_LIMIT,
        }
    }

    #[must_use]
    pub fn traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Bound on replacements at one position under [`Traversal::FixPoint`].
    #[must_use]
    pub fn rewrite_limit(mut self, limit: usize) -> Self {
        self.rewrite_limit = limit;
        self
    }

    /// Names of the plugins, in application order.
    pub fn plugin_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.plugins.iter().map(|p| p.name())
    }

    /// Rewrite the tree at `root`, returning the new root.
    ///
    /// # Panics
    /// Panics if a plugin produces an ill-formed op (debug builds), or if a
    /// fix-point pass exceeds the rewrite limit at one position.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(root = root.raw(), plugins = self.plugins.len(), traversal = ?self.traversal)
    )]
    pub fn run(&self, arena: &mut NodeArena, root: NodeId) -> NodeId {
        let mut rewrites = 0;
        let new_root = self.walk(arena, &Spine::root(root), &mut rewrites);
        tracing::debug!(rewrites, changed = new_root != root, "pass complete");
        new_root
    }

    fn walk(&self, arena: &mut NodeArena, spine: &Spine<'_>, rewrites: &mut usize) -> NodeId {
        ensure_sufficient_stack(|| {
            let node = self.rewrite_at(arena, spine, rewrites);
            if cfg!(debug_assertions) {
                validate_node(arena, node);
            }
            let here = spine.with_node(node);

            let children = arena.children(node);
            let mut rewritten = children.clone();
            for (i, &child) in children.iter().enumerate() {
                rewritten[i] = self.walk(arena, &here.child(child, i), rewrites);
            }
            arena.with_children(node, &rewritten)
        })
    }

    fn rewrite_at(
        &self,
        arena: &mut NodeArena,
        spine: &Spine<'_>,
        rewrites: &mut usize,
    ) -> NodeId {
        let mut node = spine.node();
        let mut count = 0;
        loop {
            let at = spine.with_node(node);
            let Some((plugin, replacement)) = self
                .plugins
                .iter()
                .find_map(|p| p.visit(arena, &at).map(|r| (p, r)))
            else {
                break;
            };
            if replacement == node {
                break;
            }
            assert!(
                count < self.rewrite_limit || self.traversal == Traversal::SinglePass,
                "no fix point at {:?} after {count} rewrites (still applying: {})",
                spine.node(),
                plugin.name(),
            );
            let replacement = bake_type(arena, &**plugin, node, replacement);
            if cfg!(debug_assertions) {
                validate_node(arena, replacement);
            }
            tracing::trace!(
                plugin = plugin.name(),
                from = node.raw(),
                to = replacement.raw(),
                "rewrite"
            );
            *rewrites += 1;
            node = replacement;
            count += 1;

            if self.traversal == Traversal::SinglePass {
                break;
            }
        }
        node
    }
}

/// Carry the visited node's type onto a replacement that has none.
fn bake_type(arena: &mut NodeArena, plugin: &dyn Plugin, old: NodeId, new: NodeId) -> NodeId {
    if !plugin.bakes_type() || arena.ty(new).is_some() {
        return new;
    }
    match arena.ty(old).cloned() {
        Some(ty) => arena.with_type(new, ty),
        None => new,
    }
}
