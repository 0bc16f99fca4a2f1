//! Unit-level orchestration.

use std::sync::Arc;

use tracing::debug;

use crate::ast::Program;
use crate::error::ObfuscateError;
use crate::interner::StringInterner;
use crate::resolve::resolve_program;
use crate::scramble::{HashScrambler, ScramblePrivateProperties};
use crate::traverse::{NodeVisitor, Traverser};

/// Drives the resolve pass and the scrambling passes over one unit at a
/// time. Units are independent: every pass resets its own state in its
/// unit-start hook.
pub struct Obfuscator {
    interner: Arc<StringInterner>,
    passes: Vec<Box<dyn NodeVisitor>>,
}

impl Obfuscator {
    /// Engine with the default pass set, scrambling names with a
    /// [`HashScrambler`] seeded by `salt`.
    pub fn new(interner: Arc<StringInterner>, salt: impl Into<String>) -> Self {
        let scrambler = HashScrambler::new(salt);
        let pass = ScramblePrivateProperties::new(interner.clone(), Box::new(scrambler));
        Self {
            interner,
            passes: vec![Box::new(pass)],
        }
    }

    /// Engine with an explicit pass pipeline.
    pub fn with_passes(interner: Arc<StringInterner>, passes: Vec<Box<dyn NodeVisitor>>) -> Self {
        Self { interner, passes }
    }

    /// Obfuscate one unit in place.
    pub fn obfuscate(&mut self, program: &mut Program) -> Result<(), ObfuscateError> {
        resolve_program(program, &self.interner);
        for pass in &mut self.passes {
            Traverser::traverse(program, pass.as_mut())?;
        }
        debug!("unit obfuscated");
        Ok(())
    }
}
