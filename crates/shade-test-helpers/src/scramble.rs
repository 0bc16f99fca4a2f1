//! Deterministic scrambler for tests.

use rustc_hash::{FxHashMap, FxHashSet};
use shade_core::interner::{StringId, StringInterner};
use shade_core::scramble::NameScrambler;

/// Assigns `_p0`, `_p1`, … in scan order, so tests can assert on exact
/// names. Like the production scrambler, the same original always maps to
/// the same replacement.
pub struct SequentialScrambler {
    prefix: String,
    next: usize,
    assigned: FxHashMap<StringId, StringId>,
}

impl SequentialScrambler {
    pub fn new() -> Self {
        Self::with_prefix("_p")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
            assigned: FxHashMap::default(),
        }
    }
}

impl Default for SequentialScrambler {
    fn default() -> Self {
        Self::new()
    }
}

impl NameScrambler for SequentialScrambler {
    fn scramble(
        &mut self,
        original: StringId,
        taken: &FxHashSet<StringId>,
        interner: &StringInterner,
    ) -> StringId {
        if let Some(&assigned) = self.assigned.get(&original) {
            return assigned;
        }
        loop {
            let candidate = format!("{}{}", self.prefix, self.next);
            self.next += 1;
            let id = interner.intern(&candidate);
            if id != original && !taken.contains(&id) {
                self.assigned.insert(original, id);
                return id;
            }
        }
    }
}
