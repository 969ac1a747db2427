//! The rewrite plugin contract.
//!
//! A plugin is a pure function from a tree position to "no change" or a
//! replacement node. It may allocate into the arena but never edits an
//! existing node; the driver performs the structural replace.

use tern_ir::{NodeArena, NodeId, Spine};

/// A named structural rewrite.
pub trait Plugin {
    /// Name derived from the plugin's configuration.
    ///
    /// Two plugins built from identical configuration have identical names.
    fn name(&self) -> &str;

    /// If `true`, the driver copies the visited node's target type onto a
    /// replacement that has none.
    fn bakes_type(&self) -> bool {
        false
    }

    /// Visit the node at `spine`, returning its replacement if the plugin
    /// applies.
    fn visit(&self, arena: &mut NodeArena, spine: &Spine<'_>) -> Option<NodeId>;
}

impl<P: Plugin + ?Sized> Plugin for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn bakes_type(&self) -> bool {
        (**self).bakes_type()
    }

    fn visit(&self, arena: &mut NodeArena, spine: &Spine<'_>) -> Option<NodeId> {
        (**self).visit(arena, spine)
    }
}

/// Tries each plugin in order; the first non-empty result wins.
pub struct FirstOf {
    name: String,
    plugins: Vec<Box<dyn Plugin>>,
    bakes_type: bool,
}

impl FirstOf {
    pub fn new(plugins: Vec<Box<dyn Plugin>>) -> Self {
        let names: Vec<&str> = plugins.iter().map(|p| p.name()).collect();
        let name = format!("first_of({})", names.join(", "));
        let bakes_type = plugins.iter().any(|p| p.bakes_type());
        Self {
            name,
            plugins,
            bakes_type,
        }
    }

    /// Override the derived name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override whether results get the visited node's type baked in.
    #[must_use]
    pub fn baking_type(mut self, bakes_type: bool) -> Self {
        self.bakes_type = bakes_type;
        self
    }
}

impl Plugin for FirstOf {
    fn name(&self) -> &str {
        &self.name
    }

    fn bakes_type(&self) -> bool {
        self.bakes_type
    }

    fn visit(&self, arena: &mut NodeArena, spine: &Spine<'_>) -> Option<NodeId> {
        self.plugins.iter().find_map(|p| p.visit(arena, spine))
    }
}
