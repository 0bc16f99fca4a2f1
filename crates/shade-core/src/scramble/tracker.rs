//! Per-unit rename bookkeeping.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::debug;

use crate::interner::{StringId, StringInterner};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenameError {
    /// A lookup for a name that was never recorded. Callers gate lookups
    /// with [`RenameTracker::is_renamed`]; reaching this indicates a wiring
    /// defect between the definition scan and the rewrite step, not a
    /// property of the input program.
    #[error("no replacement recorded for member `{original}`")]
    NotTracked { original: String },
}

/// Original-to-replacement map for one unit's traversal.
///
/// The map is flat across the whole unit, not keyed per class: two classes
/// that both declare a private member with the same original name share one
/// entry, and the later record wins.
pub struct RenameTracker {
    interner: Arc<StringInterner>,
    renamed: FxHashMap<StringId, StringId>,
}

impl RenameTracker {
    pub fn new(interner: Arc<StringInterner>) -> Self {
        Self {
            interner,
            renamed: FxHashMap::default(),
        }
    }

    /// Clear all mappings. Called once at the start of each unit, before the
    /// definition scan runs.
    pub fn reset(&mut self) {
        self.renamed.clear();
    }

    /// Record a rename. A duplicate `original` overwrites the earlier entry.
    pub fn record(&mut self, original: StringId, replacement: StringId) {
        debug!(
            "renamed `{}` -> `{}`",
            self.interner.resolve(original),
            self.interner.resolve(replacement)
        );
        self.renamed.insert(original, replacement);
    }

    pub fn is_renamed(&self, name: StringId) -> bool {
        self.renamed.contains_key(&name)
    }

    /// Replacement for `name`. Fails if `name` was never recorded; always
    /// guard with [`Self::is_renamed`] first.
    pub fn replacement(&self, name: StringId) -> Result<StringId, RenameError> {
        self.renamed
            .get(&name)
            .copied()
            .ok_or_else(|| RenameError::NotTracked {
                original: self.interner.resolve(name).to_string(),
            })
    }

    /// Every name the map currently mentions, originals and replacements
    /// alike. Fed to the name scrambler as its exclusion set.
    pub fn exclusions(&self) -> FxHashSet<StringId> {
        self.renamed
            .iter()
            .flat_map(|(&original, &replacement)| [original, replacement])
            .collect()
    }

    pub fn len(&self) -> usize {
        self.renamed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renamed.is_empty()
    }
}
