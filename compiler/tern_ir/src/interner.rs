//! String interner for identifiers and operator symbols.
//!
//! Single-owner: the interner lives inside a [`NodeArena`](crate::NodeArena)
//! and is only ever touched through it, so there is no locking.

use rustc_hash::FxHashMap;

use super::Name;

/// Maps strings to [`Name`]s and back.
///
/// Index 0 is always the empty string ([`Name::EMPTY`]).
#[derive(Clone, Debug)]
pub struct StringInterner {
    map: FxHashMap<Box<str>, Name>,
    strings: Vec<Box<str>>,
}

impl StringInterner {
    /// Create an interner holding only the empty string.
    pub fn new() -> Self {
        let mut interner = Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        };
        let empty = interner.intern("");
        debug_assert_eq!(empty, Name::EMPTY);
        interner
    }

    /// Intern a string, returning its `Name`.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(&name) = self.map.get(s) {
            return name;
        }
        let Ok(raw) = u32::try_from(self.strings.len()) else {
            panic!("string interner exceeded u32::MAX entries");
        };
        let name = Name::from_raw(raw);
        self.strings.push(s.into());
        self.map.insert(s.into(), name);
        name
    }

    /// Resolve a name back to its string.
    ///
    /// # Panics
    /// Panics if `name` was not produced by this interner.
    pub fn lookup(&self, name: Name) -> &str {
        &self.strings[name.index()]
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Always `false`: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
