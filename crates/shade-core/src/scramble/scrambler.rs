//! Replacement-name generation.

use rustc_hash::FxHashSet;

use crate::interner::{StringId, StringInterner};

/// Produces replacement identifiers for scrambled declarations.
///
/// Contract: the returned name is a syntactically valid identifier, differs
/// from `original`, and is not in `taken`. The caller passes every original
/// and every replacement name its unit has seen, and asks at most once per
/// original per unit, so replacements collide with neither.
pub trait NameScrambler {
    fn scramble(
        &mut self,
        original: StringId,
        taken: &FxHashSet<StringId>,
        interner: &StringInterner,
    ) -> StringId;
}

const MIN_LENGTH: usize = 4;
const FIRST_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const REST_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Default scrambler: renders a salted digest of the original name as a
/// short identifier, lengthening until it clears the exclusion set.
pub struct HashScrambler {
    salt: String,
    min_length: usize,
}

impl HashScrambler {
    pub fn new(salt: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            min_length: MIN_LENGTH,
        }
    }

    pub fn with_min_length(salt: impl Into<String>, min_length: usize) -> Self {
        Self {
            salt: salt.into(),
            min_length: min_length.max(1),
        }
    }

    fn digest(&self, source: &str, round: u32) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(source.as_bytes());
        hasher.update(&round.to_le_bytes());
        *hasher.finalize().as_bytes()
    }
}

impl NameScrambler for HashScrambler {
    fn scramble(
        &mut self,
        original: StringId,
        taken: &FxHashSet<StringId>,
        interner: &StringInterner,
    ) -> StringId {
        let source = interner.resolve(original);
        for round in 0u32.. {
            let digest = self.digest(&source, round);
            for length in self.min_length..=digest.len() {
                let candidate = render(&digest, length);
                let id = interner.intern(&candidate);
                if id != original && !taken.contains(&id) {
                    return id;
                }
            }
        }
        unreachable!("digest space exhausted")
    }
}

/// Map digest bytes onto identifier characters: `_` then a letter, then
/// letters and digits.
fn render(digest: &[u8], length: usize) -> String {
    let mut name = String::with_capacity(length + 1);
    name.push('_');
    for (i, byte) in digest.iter().cycle().take(length).enumerate() {
        let set = if i == 0 { FIRST_CHARS } else { REST_CHARS };
        name.push(set[*byte as usize % set.len()] as char);
    }
    name
}
