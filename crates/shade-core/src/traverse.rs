//! Pre-order traversal driver.
//!
//! The driver owns scheduling: it fires the unit-start hook once, then visits
//! every node in document order, recursing into children unless the visitor
//! asks to skip them. Visitors mutate nodes in place through `&mut`; the
//! walk is synchronous and never re-enters a node within one run.

use crate::ast::expression::{Expression, ExpressionKind, MemberName, StaticTarget};
use crate::ast::statement::{Block, ClassMember, Parameter, Statement};
use crate::ast::Program;
use crate::error::ObfuscateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitAction {
    Continue,
    SkipChildren,
}

/// Callbacks invoked by [`Traverser`].
#[allow(unused_variables)]
pub trait NodeVisitor {
    /// Unit-start hook, called once before any node of the unit is visited.
    fn before_unit(&mut self, program: &mut Program) -> Result<(), ObfuscateError> {
        Ok(())
    }

    fn enter_statement(&mut self, stmt: &mut Statement) -> Result<VisitAction, ObfuscateError> {
        Ok(VisitAction::Continue)
    }

    fn enter_expression(&mut self, expr: &mut Expression) -> Result<VisitAction, ObfuscateError> {
        Ok(VisitAction::Continue)
    }
}

pub struct Traverser;

impl Traverser {
    /// Walk one unit with `visitor`.
    pub fn traverse(
        program: &mut Program,
        visitor: &mut dyn NodeVisitor,
    ) -> Result<(), ObfuscateError> {
        visitor.before_unit(program)?;
        for stmt in &mut program.statements {
            Self::walk_statement(stmt, visitor)?;
        }
        Ok(())
    }

    fn walk_statement(
        stmt: &mut Statement,
        visitor: &mut dyn NodeVisitor,
    ) -> Result<(), ObfuscateError> {
        if visitor.enter_statement(stmt)? == VisitAction::SkipChildren {
            return Ok(());
        }
        match stmt {
            Statement::Namespace(ns) => Self::walk_block(&mut ns.body, visitor),
            Statement::Class(class) => {
                for member in &mut class.members {
                    Self::walk_member(member, visitor)?;
                }
                Ok(())
            }
            Statement::Function(func) => {
                for param in &mut func.params {
                    Self::walk_parameter(param, visitor)?;
                }
                Self::walk_block(&mut func.body, visitor)
            }
            Statement::If(if_stmt) => {
                Self::walk_expression(&mut if_stmt.condition, visitor)?;
                Self::walk_block(&mut if_stmt.then_block, visitor)?;
                for else_if in &mut if_stmt.else_ifs {
                    Self::walk_expression(&mut else_if.condition, visitor)?;
                    Self::walk_block(&mut else_if.block, visitor)?;
                }
                if let Some(else_block) = &mut if_stmt.else_block {
                    Self::walk_block(else_block, visitor)?;
                }
                Ok(())
            }
            Statement::While(while_stmt) => {
                Self::walk_expression(&mut while_stmt.condition, visitor)?;
                Self::walk_block(&mut while_stmt.body, visitor)
            }
            Statement::Return(return_stmt) => {
                if let Some(value) = &mut return_stmt.value {
                    Self::walk_expression(value, visitor)?;
                }
                Ok(())
            }
            Statement::Echo(exprs) => {
                for expr in exprs {
                    Self::walk_expression(expr, visitor)?;
                }
                Ok(())
            }
            Statement::Expression(expr) => Self::walk_expression(expr, visitor),
            Statement::Block(block) => Self::walk_block(block, visitor),
        }
    }

    fn walk_member(
        member: &mut ClassMember,
        visitor: &mut dyn NodeVisitor,
    ) -> Result<(), ObfuscateError> {
        match member {
            ClassMember::Property(prop) => {
                for entry in &mut prop.entries {
                    if let Some(default) = &mut entry.default {
                        Self::walk_expression(default, visitor)?;
                    }
                }
                Ok(())
            }
            ClassMember::Method(method) => {
                for param in &mut method.params {
                    Self::walk_parameter(param, visitor)?;
                }
                Self::walk_block(&mut method.body, visitor)
            }
            ClassMember::Const(konst) => Self::walk_expression(&mut konst.value, visitor),
        }
    }

    fn walk_parameter(
        param: &mut Parameter,
        visitor: &mut dyn NodeVisitor,
    ) -> Result<(), ObfuscateError> {
        if let Some(default) = &mut param.default {
            Self::walk_expression(default, visitor)?;
        }
        Ok(())
    }

    fn walk_block(block: &mut Block, visitor: &mut dyn NodeVisitor) -> Result<(), ObfuscateError> {
        for stmt in &mut block.statements {
            Self::walk_statement(stmt, visitor)?;
        }
        Ok(())
    }

    fn walk_expression(
        expr: &mut Expression,
        visitor: &mut dyn NodeVisitor,
    ) -> Result<(), ObfuscateError> {
        if visitor.enter_expression(expr)? == VisitAction::SkipChildren {
            return Ok(());
        }
        match &mut expr.kind {
            ExpressionKind::PropertyFetch(fetch) => {
                Self::walk_expression(&mut fetch.target, visitor)?;
                Self::walk_member_name(&mut fetch.name, visitor)
            }
            ExpressionKind::StaticPropertyFetch(fetch) => {
                Self::walk_static_target(&mut fetch.class, visitor)?;
                Self::walk_member_name(&mut fetch.name, visitor)
            }
            ExpressionKind::MethodCall(call) => {
                Self::walk_expression(&mut call.target, visitor)?;
                Self::walk_member_name(&mut call.name, visitor)?;
                for arg in &mut call.args {
                    Self::walk_expression(arg, visitor)?;
                }
                Ok(())
            }
            ExpressionKind::StaticCall(call) => {
                Self::walk_static_target(&mut call.class, visitor)?;
                Self::walk_member_name(&mut call.name, visitor)?;
                for arg in &mut call.args {
                    Self::walk_expression(arg, visitor)?;
                }
                Ok(())
            }
            ExpressionKind::FunctionCall(call) => {
                for arg in &mut call.args {
                    Self::walk_expression(arg, visitor)?;
                }
                Ok(())
            }
            ExpressionKind::New(new_expr) => {
                Self::walk_static_target(&mut new_expr.class, visitor)?;
                for arg in &mut new_expr.args {
                    Self::walk_expression(arg, visitor)?;
                }
                Ok(())
            }
            ExpressionKind::Assign(assign) => {
                Self::walk_expression(&mut assign.target, visitor)?;
                Self::walk_expression(&mut assign.value, visitor)
            }
            ExpressionKind::Binary(binary) => {
                Self::walk_expression(&mut binary.lhs, visitor)?;
                Self::walk_expression(&mut binary.rhs, visitor)
            }
            ExpressionKind::Variable(_)
            | ExpressionKind::StringLiteral(_)
            | ExpressionKind::IntLiteral(_)
            | ExpressionKind::BoolLiteral(_)
            | ExpressionKind::Null => Ok(()),
        }
    }

    fn walk_member_name(
        name: &mut MemberName,
        visitor: &mut dyn NodeVisitor,
    ) -> Result<(), ObfuscateError> {
        if let MemberName::Dynamic(expr) = name {
            Self::walk_expression(expr, visitor)?;
        }
        Ok(())
    }

    fn walk_static_target(
        target: &mut StaticTarget,
        visitor: &mut dyn NodeVisitor,
    ) -> Result<(), ObfuscateError> {
        if let StaticTarget::Dynamic(expr) = target {
            Self::walk_expression(expr, visitor)?;
        }
        Ok(())
    }
}
