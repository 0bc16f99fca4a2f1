//! String interner for identifier deduplication.
//!
//! All identifier names in the AST are interned `StringId`s, so the locality
//! resolver and the rename tracker compare names as integers instead of
//! strings. The interner sits behind a `parking_lot::RwLock` and is shared as
//! `Arc<StringInterner>` between the parser front end, the annotation pass,
//! and the scrambling passes.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// An interned string handle.
///
/// Cheap to copy and comparable in O(1). Use [`StringInterner::resolve`] to
/// get the string back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringId(u32);

/// Identifiers the scrambling passes test against on every member access.
const KEYWORDS: &[&str] = &["this", "self", "parent", "static"];

#[derive(Default)]
struct InternerState {
    map: FxHashMap<Arc<str>, StringId>,
    strings: Vec<Arc<str>>,
}

/// Thread-shareable string interner.
pub struct StringInterner {
    state: RwLock<InternerState>,
}

impl StringInterner {
    /// Create an interner with the resolver keywords pre-interned.
    pub fn new() -> Self {
        let interner = Self {
            state: RwLock::new(InternerState::default()),
        };
        for keyword in KEYWORDS {
            interner.intern(keyword);
        }
        interner
    }

    /// Intern a string, returning the existing handle if it was seen before.
    pub fn intern(&self, s: &str) -> StringId {
        if let Some(&id) = self.state.read().map.get(s) {
            return id;
        }

        let mut state = self.state.write();
        // Another writer may have interned it between the locks.
        if let Some(&id) = state.map.get(s) {
            return id;
        }
        let id = StringId(state.strings.len() as u32);
        let owned: Arc<str> = Arc::from(s);
        state.strings.push(owned.clone());
        state.map.insert(owned, id);
        id
    }

    /// Resolve a handle back to its string.
    ///
    /// Panics if `id` did not come from this interner.
    pub fn resolve(&self, id: StringId) -> Arc<str> {
        self.state.read().strings[id.0 as usize].clone()
    }

    /// Number of distinct strings interned so far.
    pub fn len(&self) -> usize {
        self.state.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
