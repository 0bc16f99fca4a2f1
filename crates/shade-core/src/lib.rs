//! Scrambling core for Shade, a source-to-source obfuscator of a PHP-like,
//! class-based language.
//!
//! The pipeline for one unit: the resolve pass stamps fully-qualified class
//! names and the enclosing-class side channel, then each scrambling pass is
//! driven over the tree by the traversal framework. A pass's unit-start hook
//! resets its rename map and scans declarations; its per-node hook rewrites
//! the accesses it can prove refer to the scanned declarations. Anything
//! unprovable is left alone: a missed rename costs obfuscation, a wrong
//! rename silently changes program behavior.
//!
//! Parsing source text and regenerating it from the mutated tree are the
//! front end's and code generator's jobs; this crate only rewrites the tree
//! in place.

pub mod ast;
pub mod error;
pub mod interner;
pub mod obfuscator;
pub mod resolve;
pub mod scramble;
pub mod span;
pub mod traverse;

pub use error::ObfuscateError;
pub use interner::{StringId, StringInterner};
pub use obfuscator::Obfuscator;
pub use scramble::{
    HashScrambler, NameScrambler, RenameError, RenameTracker, ScramblePrivateProperties,
};
pub use traverse::{NodeVisitor, Traverser, VisitAction};
