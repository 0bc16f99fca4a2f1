//! Scrambles private property declarations and every provably-local access
//! to them.
//!
//! The unit-start hook resets the tracker, then scans the whole unit for
//! private property declarations, renaming each in place and recording the
//! mapping. The per-node hook then rewrites member accesses that the
//! locality check certifies as targeting the enclosing class. Declarations
//! are renamed unconditionally, so an access the check cannot prove local
//! keeps its original name in the output.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::ast::expression::{Expression, ExpressionKind, MemberName};
use crate::ast::statement::{AccessModifier, ClassDeclaration, ClassMember, Statement};
use crate::ast::Program;
use crate::error::ObfuscateError;
use crate::interner::{StringId, StringInterner};
use crate::traverse::{NodeVisitor, VisitAction};

use super::locality::{is_local, FetchRef};
use super::scrambler::NameScrambler;
use super::tracker::RenameTracker;

pub struct ScramblePrivateProperties {
    interner: Arc<StringInterner>,
    tracker: RenameTracker,
    scrambler: Box<dyn NameScrambler>,
    this: StringId,
}

impl ScramblePrivateProperties {
    pub fn new(interner: Arc<StringInterner>, scrambler: Box<dyn NameScrambler>) -> Self {
        let this = interner.intern("this");
        Self {
            tracker: RenameTracker::new(interner.clone()),
            interner,
            scrambler,
            this,
        }
    }

    /// The rename map populated by the last scanned unit.
    pub fn tracker(&self) -> &RenameTracker {
        &self.tracker
    }

    /// Collect every private property name declared anywhere in the unit.
    /// Seeding the exclusion set with them keeps replacements clear of
    /// originals that are scanned later.
    fn collect_private_names(stmts: &[Statement], reserved: &mut FxHashSet<StringId>) {
        for stmt in stmts {
            match stmt {
                Statement::Class(class) => {
                    for member in &class.members {
                        match member {
                            ClassMember::Property(prop)
                                if prop.visibility == AccessModifier::Private =>
                            {
                                reserved.extend(prop.entries.iter().map(|e| e.name.node));
                            }
                            ClassMember::Method(method) => {
                                Self::collect_private_names(&method.body.statements, reserved);
                            }
                            ClassMember::Property(_) | ClassMember::Const(_) => {}
                        }
                    }
                }
                Statement::Namespace(ns) => {
                    Self::collect_private_names(&ns.body.statements, reserved);
                }
                Statement::Function(func) => {
                    Self::collect_private_names(&func.body.statements, reserved);
                }
                Statement::If(if_stmt) => {
                    Self::collect_private_names(&if_stmt.then_block.statements, reserved);
                    for else_if in &if_stmt.else_ifs {
                        Self::collect_private_names(&else_if.block.statements, reserved);
                    }
                    if let Some(else_block) = &if_stmt.else_block {
                        Self::collect_private_names(&else_block.statements, reserved);
                    }
                }
                Statement::While(while_stmt) => {
                    Self::collect_private_names(&while_stmt.body.statements, reserved);
                }
                Statement::Block(block) => {
                    Self::collect_private_names(&block.statements, reserved);
                }
                Statement::Return(_) | Statement::Echo(_) | Statement::Expression(_) => {}
            }
        }
    }

    /// Recursively scan for private property declarations and rename them.
    /// Statement lists nest arbitrarily; class declarations can appear in
    /// any of them.
    fn scan_statements(
        &mut self,
        stmts: &mut [Statement],
        reserved: &FxHashSet<StringId>,
    ) -> Result<(), ObfuscateError> {
        for stmt in stmts {
            match stmt {
                Statement::Class(class) => self.scan_class(class, reserved)?,
                Statement::Namespace(ns) => {
                    self.scan_statements(&mut ns.body.statements, reserved)?;
                }
                Statement::Function(func) => {
                    self.scan_statements(&mut func.body.statements, reserved)?;
                }
                Statement::If(if_stmt) => {
                    self.scan_statements(&mut if_stmt.then_block.statements, reserved)?;
                    for else_if in &mut if_stmt.else_ifs {
                        self.scan_statements(&mut else_if.block.statements, reserved)?;
                    }
                    if let Some(else_block) = &mut if_stmt.else_block {
                        self.scan_statements(&mut else_block.statements, reserved)?;
                    }
                }
                Statement::While(while_stmt) => {
                    self.scan_statements(&mut while_stmt.body.statements, reserved)?;
                }
                Statement::Block(block) => {
                    self.scan_statements(&mut block.statements, reserved)?;
                }
                Statement::Return(_) | Statement::Echo(_) | Statement::Expression(_) => {}
            }
        }
        Ok(())
    }

    fn scan_class(
        &mut self,
        class: &mut ClassDeclaration,
        reserved: &FxHashSet<StringId>,
    ) -> Result<(), ObfuscateError> {
        for member in &mut class.members {
            match member {
                ClassMember::Property(prop) if prop.visibility == AccessModifier::Private => {
                    for entry in &mut prop.entries {
                        let original = entry.name.node;
                        // A name another class already declared folds to the
                        // same flat-map entry.
                        let replacement = if self.tracker.is_renamed(original) {
                            self.tracker.replacement(original)?
                        } else {
                            let taken = self.exclusions(reserved);
                            self.scrambler.scramble(original, &taken, &self.interner)
                        };
                        entry.name.node = replacement;
                        self.tracker.record(original, replacement);
                    }
                }
                // Non-private declarations are left untouched.
                ClassMember::Property(_) | ClassMember::Const(_) => {}
                ClassMember::Method(method) => {
                    self.scan_statements(&mut method.body.statements, reserved)?;
                }
            }
        }
        Ok(())
    }

    /// Names unavailable as a replacement: every private original in the
    /// unit plus everything the tracker has recorded.
    fn exclusions(&self, reserved: &FxHashSet<StringId>) -> FxHashSet<StringId> {
        let mut taken = self.tracker.exclusions();
        taken.extend(reserved.iter().copied());
        taken
    }

    fn rewrite(&mut self, expr: &mut Expression) -> Result<(), ObfuscateError> {
        let (local, name) = match &expr.kind {
            ExpressionKind::PropertyFetch(fetch) => match fetch.name.as_literal() {
                Some(name) => (is_local(FetchRef::Instance(fetch), self.this), name),
                None => {
                    trace!("skipping property fetch with runtime-computed name");
                    return Ok(());
                }
            },
            ExpressionKind::StaticPropertyFetch(fetch) => match fetch.name.as_literal() {
                Some(name) => (is_local(FetchRef::Static(fetch), self.this), name),
                None => {
                    trace!("skipping static property fetch with runtime-computed name");
                    return Ok(());
                }
            },
            _ => return Ok(()),
        };

        if !local || !self.tracker.is_renamed(name) {
            return Ok(());
        }
        let replacement = self.tracker.replacement(name)?;

        let member_name = match &mut expr.kind {
            ExpressionKind::PropertyFetch(fetch) => &mut fetch.name,
            ExpressionKind::StaticPropertyFetch(fetch) => &mut fetch.name,
            _ => unreachable!(),
        };
        if let MemberName::Literal(literal) = member_name {
            literal.node = replacement;
        }
        Ok(())
    }
}

impl NodeVisitor for ScramblePrivateProperties {
    fn before_unit(&mut self, program: &mut Program) -> Result<(), ObfuscateError> {
        self.tracker.reset();
        let mut reserved = FxHashSet::default();
        Self::collect_private_names(&program.statements, &mut reserved);
        self.scan_statements(&mut program.statements, &reserved)?;
        debug!("scanned unit: {} private properties renamed", self.tracker.len());
        Ok(())
    }

    fn enter_expression(&mut self, expr: &mut Expression) -> Result<VisitAction, ObfuscateError> {
        self.rewrite(expr)?;
        Ok(VisitAction::Continue)
    }
}
