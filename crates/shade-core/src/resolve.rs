//! Name and class-context resolution.
//!
//! Runs once per unit before any scrambling pass. It stamps every class
//! declaration with its fully-qualified name, resolves literal class-name
//! targets to fully-qualified names, and fills the [`FetchMeta`] side channel
//! of every member-access expression with the innermost lexically enclosing
//! class. The locality resolver only compares the stamps; it never walks the
//! tree itself.
//!
//! Unqualified names resolve against the current namespace by prefixing.
//! Import tables (`use` statements) are handled by the parser front end and
//! never reach this pass.

use std::sync::Arc;

use crate::ast::expression::{
    EnclosingClass, Expression, ExpressionKind, FetchMeta, MemberName, Name, StaticTarget,
};
use crate::ast::statement::{Block, ClassDeclaration, ClassMember, Parameter, Statement};
use crate::ast::Program;
use crate::interner::{StringId, StringInterner};

const NAMESPACE_SEPARATOR: &str = "\\";

pub struct Resolver {
    interner: Arc<StringInterner>,
    namespace: Vec<StringId>,
    class_stack: Vec<StringId>,
}

/// Resolve one unit in place.
pub fn resolve_program(program: &mut Program, interner: &Arc<StringInterner>) {
    Resolver::new(interner.clone()).resolve(program);
}

impl Resolver {
    pub fn new(interner: Arc<StringInterner>) -> Self {
        Self {
            interner,
            namespace: Vec::new(),
            class_stack: Vec::new(),
        }
    }

    pub fn resolve(&mut self, program: &mut Program) {
        self.namespace.clear();
        self.class_stack.clear();
        for stmt in &mut program.statements {
            self.resolve_statement(stmt);
        }
    }

    fn resolve_statement(&mut self, stmt: &mut Statement) {
        match stmt {
            Statement::Namespace(ns) => {
                let saved = std::mem::take(&mut self.namespace);
                if let Some(name) = &ns.name {
                    self.namespace = name.parts.clone();
                }
                self.resolve_block(&mut ns.body);
                self.namespace = saved;
            }
            Statement::Class(class) => self.resolve_class(class),
            Statement::Function(func) => {
                for param in &mut func.params {
                    self.resolve_parameter(param);
                }
                self.resolve_block(&mut func.body);
            }
            Statement::If(if_stmt) => {
                self.resolve_expression(&mut if_stmt.condition);
                self.resolve_block(&mut if_stmt.then_block);
                for else_if in &mut if_stmt.else_ifs {
                    self.resolve_expression(&mut else_if.condition);
                    self.resolve_block(&mut else_if.block);
                }
                if let Some(else_block) = &mut if_stmt.else_block {
                    self.resolve_block(else_block);
                }
            }
            Statement::While(while_stmt) => {
                self.resolve_expression(&mut while_stmt.condition);
                self.resolve_block(&mut while_stmt.body);
            }
            Statement::Return(return_stmt) => {
                if let Some(value) = &mut return_stmt.value {
                    self.resolve_expression(value);
                }
            }
            Statement::Echo(exprs) => {
                for expr in exprs {
                    self.resolve_expression(expr);
                }
            }
            Statement::Expression(expr) => self.resolve_expression(expr),
            Statement::Block(block) => self.resolve_block(block),
        }
    }

    fn resolve_class(&mut self, class: &mut ClassDeclaration) {
        let fqcn = self.qualify(&[class.name.node]);
        class.namespaced_name = Some(fqcn);
        if let Some(extends) = &mut class.extends {
            self.resolve_name(extends);
        }

        self.class_stack.push(fqcn);
        for member in &mut class.members {
            match member {
                ClassMember::Property(prop) => {
                    for entry in &mut prop.entries {
                        if let Some(default) = &mut entry.default {
                            self.resolve_expression(default);
                        }
                    }
                }
                ClassMember::Method(method) => {
                    for param in &mut method.params {
                        self.resolve_parameter(param);
                    }
                    self.resolve_block(&mut method.body);
                }
                ClassMember::Const(konst) => self.resolve_expression(&mut konst.value),
            }
        }
        self.class_stack.pop();
    }

    fn resolve_parameter(&mut self, param: &mut Parameter) {
        if let Some(hint) = &mut param.type_hint {
            self.resolve_name(hint);
        }
        if let Some(default) = &mut param.default {
            self.resolve_expression(default);
        }
    }

    fn resolve_block(&mut self, block: &mut Block) {
        for stmt in &mut block.statements {
            self.resolve_statement(stmt);
        }
    }

    fn resolve_expression(&mut self, expr: &mut Expression) {
        match &mut expr.kind {
            ExpressionKind::PropertyFetch(fetch) => {
                fetch.meta = self.fetch_meta();
                self.resolve_expression(&mut fetch.target);
                self.resolve_member_name(&mut fetch.name);
            }
            ExpressionKind::StaticPropertyFetch(fetch) => {
                fetch.meta = self.fetch_meta();
                self.resolve_static_target(&mut fetch.class);
                self.resolve_member_name(&mut fetch.name);
            }
            ExpressionKind::MethodCall(call) => {
                self.resolve_expression(&mut call.target);
                self.resolve_member_name(&mut call.name);
                for arg in &mut call.args {
                    self.resolve_expression(arg);
                }
            }
            ExpressionKind::StaticCall(call) => {
                self.resolve_static_target(&mut call.class);
                self.resolve_member_name(&mut call.name);
                for arg in &mut call.args {
                    self.resolve_expression(arg);
                }
            }
            ExpressionKind::FunctionCall(call) => {
                for arg in &mut call.args {
                    self.resolve_expression(arg);
                }
            }
            ExpressionKind::New(new_expr) => {
                self.resolve_static_target(&mut new_expr.class);
                for arg in &mut new_expr.args {
                    self.resolve_expression(arg);
                }
            }
            ExpressionKind::Assign(assign) => {
                self.resolve_expression(&mut assign.target);
                self.resolve_expression(&mut assign.value);
            }
            ExpressionKind::Binary(binary) => {
                self.resolve_expression(&mut binary.lhs);
                self.resolve_expression(&mut binary.rhs);
            }
            ExpressionKind::Variable(_)
            | ExpressionKind::StringLiteral(_)
            | ExpressionKind::IntLiteral(_)
            | ExpressionKind::BoolLiteral(_)
            | ExpressionKind::Null => {}
        }
    }

    fn resolve_member_name(&mut self, name: &mut MemberName) {
        if let MemberName::Dynamic(expr) = name {
            self.resolve_expression(expr);
        }
    }

    fn resolve_static_target(&mut self, target: &mut StaticTarget) {
        match target {
            StaticTarget::Name(name) => self.resolve_name(name),
            StaticTarget::Dynamic(expr) => self.resolve_expression(expr),
            StaticTarget::SelfRef(_) | StaticTarget::Parent(_) | StaticTarget::LateStatic(_) => {}
        }
    }

    fn resolve_name(&mut self, name: &mut Name) {
        let fqcn = if name.fully_qualified {
            self.join(&name.parts)
        } else {
            self.qualify(&name.parts)
        };
        name.resolved = Some(fqcn);
    }

    fn fetch_meta(&self) -> FetchMeta {
        FetchMeta {
            enclosing_class: self
                .class_stack
                .last()
                .map(|&fqcn| EnclosingClass { fqcn }),
        }
    }

    /// Fully qualify `parts` against the current namespace.
    fn qualify(&self, parts: &[StringId]) -> StringId {
        let mut all = self.namespace.clone();
        all.extend_from_slice(parts);
        self.join(&all)
    }

    fn join(&self, parts: &[StringId]) -> StringId {
        let joined = parts
            .iter()
            .map(|&part| self.interner.resolve(part).to_string())
            .collect::<Vec<_>>()
            .join(NAMESPACE_SEPARATOR);
        self.interner.intern(&joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::PropertyFetch;
    use crate::ast::statement::NamespaceDeclaration;
    use crate::span::{Span, Spanned};

    fn interner() -> Arc<StringInterner> {
        Arc::new(StringInterner::new())
    }

    fn class_with_method_body(
        interner: &StringInterner,
        name: &str,
        body: Vec<Statement>,
    ) -> Statement {
        use crate::ast::statement::{AccessModifier, MethodDeclaration};
        Statement::Class(Box::new(ClassDeclaration {
            name: Spanned::new(interner.intern(name), Span::dummy()),
            namespaced_name: None,
            extends: None,
            members: vec![ClassMember::Method(MethodDeclaration {
                visibility: AccessModifier::Public,
                is_static: false,
                name: Spanned::new(interner.intern("run"), Span::dummy()),
                params: Vec::new(),
                body: Block::new(body),
                span: Span::dummy(),
            })],
            span: Span::dummy(),
        }))
    }

    fn this_fetch(interner: &StringInterner, prop: &str) -> Statement {
        Statement::Expression(Expression::new(
            ExpressionKind::PropertyFetch(Box::new(PropertyFetch {
                target: Expression::new(
                    ExpressionKind::Variable(interner.intern("this")),
                    Span::dummy(),
                ),
                name: MemberName::Literal(Spanned::new(interner.intern(prop), Span::dummy())),
                meta: FetchMeta::default(),
            })),
            Span::dummy(),
        ))
    }

    #[test]
    fn class_fqcn_includes_namespace() {
        let interner = interner();
        let demo = interner.intern("Demo");
        let app = interner.intern("App");
        let mut program = Program::new(vec![Statement::Namespace(Box::new(
            NamespaceDeclaration {
                name: Some(Name::new(vec![app, demo], false, Span::dummy())),
                body: Block::new(vec![class_with_method_body(&interner, "Foo", Vec::new())]),
                span: Span::dummy(),
            },
        ))]);

        resolve_program(&mut program, &interner);

        let Statement::Namespace(ns) = &program.statements[0] else {
            panic!("expected namespace");
        };
        let Statement::Class(class) = &ns.body.statements[0] else {
            panic!("expected class");
        };
        let fqcn = class.namespaced_name.expect("fqcn stamped");
        assert_eq!(&*interner.resolve(fqcn), "App\\Demo\\Foo");
    }

    #[test]
    fn fetch_meta_names_innermost_class() {
        let interner = interner();
        let inner_body = vec![this_fetch(&interner, "x")];
        let inner = class_with_method_body(&interner, "Inner", inner_body);
        let outer = class_with_method_body(&interner, "Outer", vec![inner]);
        let mut program = Program::new(vec![outer]);

        resolve_program(&mut program, &interner);

        let Statement::Class(outer) = &program.statements[0] else {
            panic!("expected class");
        };
        let ClassMember::Method(method) = &outer.members[0] else {
            panic!("expected method");
        };
        let Statement::Class(inner) = &method.body.statements[0] else {
            panic!("expected nested class");
        };
        let ClassMember::Method(inner_method) = &inner.members[0] else {
            panic!("expected method");
        };
        let Statement::Expression(expr) = &inner_method.body.statements[0] else {
            panic!("expected expression statement");
        };
        let ExpressionKind::PropertyFetch(fetch) = &expr.kind else {
            panic!("expected property fetch");
        };
        let enclosing = fetch.meta.enclosing_class.expect("meta stamped");
        assert_eq!(&*interner.resolve(enclosing.fqcn), "Inner");
    }

    #[test]
    fn access_outside_class_has_no_enclosing_class() {
        let interner = interner();
        let mut program = Program::new(vec![this_fetch(&interner, "x")]);

        resolve_program(&mut program, &interner);

        let Statement::Expression(expr) = &program.statements[0] else {
            panic!("expected expression statement");
        };
        let ExpressionKind::PropertyFetch(fetch) = &expr.kind else {
            panic!("expected property fetch");
        };
        assert!(fetch.meta.enclosing_class.is_none());
    }

    #[test]
    fn leading_backslash_name_ignores_namespace() {
        let interner = interner();
        let ns_id = interner.intern("App");
        let other = interner.intern("Other");
        let foo = interner.intern("Foo");
        let mut target = StaticTarget::Name(Name::new(vec![other, foo], true, Span::dummy()));

        let mut resolver = Resolver::new(interner.clone());
        resolver.namespace = vec![ns_id];
        resolver.resolve_static_target(&mut target);

        let StaticTarget::Name(name) = &target else {
            unreachable!();
        };
        assert_eq!(
            &*interner.resolve(name.resolved.expect("resolved")),
            "Other\\Foo"
        );
    }
}
