//! AST fixture builder.
//!
//! Tests have no parser front end, so they assemble units directly. The
//! builder owns a shared interner and keeps fixture code close to the shape
//! of the source it stands in for.

use std::sync::Arc;

use shade_core::ast::expression::{
    AssignExpression, Expression, ExpressionKind, FetchMeta, MemberName, MethodCall, Name,
    NewExpression, PropertyFetch, StaticPropertyFetch, StaticTarget,
};
use shade_core::ast::statement::{
    AccessModifier, Block, ClassDeclaration, ClassMember, ElseIfClause, FunctionDeclaration,
    IfStatement, MethodDeclaration, NamespaceDeclaration, PropertyDeclaration, PropertyEntry,
    ReturnStatement, Statement,
};
use shade_core::ast::Program;
use shade_core::interner::{StringId, StringInterner};
use shade_core::span::{Span, Spanned};

pub struct AstBuilder {
    interner: Arc<StringInterner>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self {
            interner: Arc::new(StringInterner::new()),
        }
    }

    pub fn interner(&self) -> Arc<StringInterner> {
        self.interner.clone()
    }

    pub fn id(&self, name: &str) -> StringId {
        self.interner.intern(name)
    }

    pub fn resolve(&self, id: StringId) -> String {
        self.interner.resolve(id).to_string()
    }

    fn spanned(&self, name: &str) -> Spanned<StringId> {
        Spanned::new(self.id(name), Span::dummy())
    }

    /// `Foo\Bar` splits into parts; a leading `\` marks it fully qualified.
    pub fn name(&self, name: &str) -> Name {
        let fully_qualified = name.starts_with('\\');
        let parts = name
            .trim_start_matches('\\')
            .split('\\')
            .map(|part| self.id(part))
            .collect();
        Name::new(parts, fully_qualified, Span::dummy())
    }

    // ----- statements -----

    pub fn program(&self, statements: Vec<Statement>) -> Program {
        Program::new(statements)
    }

    pub fn namespace(&self, name: &str, statements: Vec<Statement>) -> Statement {
        Statement::Namespace(Box::new(NamespaceDeclaration {
            name: Some(self.name(name)),
            body: Block::new(statements),
            span: Span::dummy(),
        }))
    }

    pub fn class(&self, name: &str, members: Vec<ClassMember>) -> Statement {
        Statement::Class(Box::new(ClassDeclaration {
            name: self.spanned(name),
            namespaced_name: None,
            extends: None,
            members,
            span: Span::dummy(),
        }))
    }

    pub fn class_extends(&self, name: &str, base: &str, members: Vec<ClassMember>) -> Statement {
        Statement::Class(Box::new(ClassDeclaration {
            name: self.spanned(name),
            namespaced_name: None,
            extends: Some(self.name(base)),
            members,
            span: Span::dummy(),
        }))
    }

    pub fn func(&self, name: &str, body: Vec<Statement>) -> Statement {
        Statement::Function(Box::new(FunctionDeclaration {
            name: self.spanned(name),
            params: Vec::new(),
            body: Block::new(body),
            span: Span::dummy(),
        }))
    }

    pub fn if_stmt(&self, condition: Expression, then_body: Vec<Statement>) -> Statement {
        Statement::If(Box::new(IfStatement {
            condition,
            then_block: Block::new(then_body),
            else_ifs: Vec::<ElseIfClause>::new(),
            else_block: None,
        }))
    }

    pub fn ret(&self, value: Expression) -> Statement {
        Statement::Return(ReturnStatement {
            value: Some(value),
            span: Span::dummy(),
        })
    }

    pub fn expr_stmt(&self, expr: Expression) -> Statement {
        Statement::Expression(expr)
    }

    pub fn echo(&self, exprs: Vec<Expression>) -> Statement {
        Statement::Echo(exprs)
    }

    // ----- class members -----

    pub fn prop(&self, visibility: AccessModifier, names: &[&str]) -> ClassMember {
        ClassMember::Property(PropertyDeclaration {
            visibility,
            is_static: false,
            entries: names
                .iter()
                .map(|name| PropertyEntry {
                    name: self.spanned(name),
                    default: None,
                })
                .collect(),
            span: Span::dummy(),
        })
    }

    pub fn private_prop(&self, names: &[&str]) -> ClassMember {
        self.prop(AccessModifier::Private, names)
    }

    pub fn static_prop(&self, visibility: AccessModifier, names: &[&str]) -> ClassMember {
        let ClassMember::Property(mut prop) = self.prop(visibility, names) else {
            unreachable!();
        };
        prop.is_static = true;
        ClassMember::Property(prop)
    }

    pub fn method(&self, name: &str, body: Vec<Statement>) -> ClassMember {
        ClassMember::Method(MethodDeclaration {
            visibility: AccessModifier::Public,
            is_static: false,
            name: self.spanned(name),
            params: Vec::new(),
            body: Block::new(body),
            span: Span::dummy(),
        })
    }

    // ----- expressions -----

    pub fn var(&self, name: &str) -> Expression {
        Expression::new(ExpressionKind::Variable(self.id(name)), Span::dummy())
    }

    pub fn int_lit(&self, value: i64) -> Expression {
        Expression::new(ExpressionKind::IntLiteral(value), Span::dummy())
    }

    pub fn str_lit(&self, value: &str) -> Expression {
        Expression::new(ExpressionKind::StringLiteral(self.id(value)), Span::dummy())
    }

    pub fn bool_lit(&self, value: bool) -> Expression {
        Expression::new(ExpressionKind::BoolLiteral(value), Span::dummy())
    }

    pub fn assign(&self, target: Expression, value: Expression) -> Expression {
        Expression::new(
            ExpressionKind::Assign(Box::new(AssignExpression { target, value })),
            Span::dummy(),
        )
    }

    pub fn new_object(&self, class: &str, args: Vec<Expression>) -> Expression {
        Expression::new(
            ExpressionKind::New(Box::new(NewExpression {
                class: StaticTarget::Name(self.name(class)),
                args,
            })),
            Span::dummy(),
        )
    }

    pub fn method_call(&self, target: Expression, name: &str, args: Vec<Expression>) -> Expression {
        Expression::new(
            ExpressionKind::MethodCall(Box::new(MethodCall {
                target,
                name: MemberName::Literal(self.spanned(name)),
                args,
            })),
            Span::dummy(),
        )
    }

    /// `$this->prop`
    pub fn this_fetch(&self, prop: &str) -> Expression {
        self.obj_fetch("this", prop)
    }

    /// `$var->prop`
    pub fn obj_fetch(&self, var: &str, prop: &str) -> Expression {
        Expression::new(
            ExpressionKind::PropertyFetch(Box::new(PropertyFetch {
                target: self.var(var),
                name: MemberName::Literal(self.spanned(prop)),
                meta: FetchMeta::default(),
            })),
            Span::dummy(),
        )
    }

    /// `$target->{$expr}` — runtime-computed member name.
    pub fn dynamic_name_fetch(&self, target: Expression, name: Expression) -> Expression {
        Expression::new(
            ExpressionKind::PropertyFetch(Box::new(PropertyFetch {
                target,
                name: MemberName::Dynamic(Box::new(name)),
                meta: FetchMeta::default(),
            })),
            Span::dummy(),
        )
    }

    fn static_fetch_with(&self, class: StaticTarget, prop: &str) -> Expression {
        Expression::new(
            ExpressionKind::StaticPropertyFetch(Box::new(StaticPropertyFetch {
                class,
                name: MemberName::Literal(self.spanned(prop)),
                meta: FetchMeta::default(),
            })),
            Span::dummy(),
        )
    }

    /// `self::$prop`
    pub fn self_fetch(&self, prop: &str) -> Expression {
        self.static_fetch_with(StaticTarget::SelfRef(Span::dummy()), prop)
    }

    /// `parent::$prop`
    pub fn parent_fetch(&self, prop: &str) -> Expression {
        self.static_fetch_with(StaticTarget::Parent(Span::dummy()), prop)
    }

    /// `static::$prop`
    pub fn late_static_fetch(&self, prop: &str) -> Expression {
        self.static_fetch_with(StaticTarget::LateStatic(Span::dummy()), prop)
    }

    /// `Class::$prop` with a literal, possibly namespaced class name.
    pub fn class_fetch(&self, class: &str, prop: &str) -> Expression {
        self.static_fetch_with(StaticTarget::Name(self.name(class)), prop)
    }

    /// `$var::$prop` — class picked at runtime.
    pub fn dynamic_class_fetch(&self, var: &str, prop: &str) -> Expression {
        self.static_fetch_with(StaticTarget::Dynamic(Box::new(self.var(var))), prop)
    }

    // ----- navigation -----

    /// Find a class declaration by its (unqualified) name, searching nested
    /// statement lists.
    pub fn find_class<'a>(&self, program: &'a Program, name: &str) -> &'a ClassDeclaration {
        let wanted = self.id(name);
        find_class_in(&program.statements, wanted)
            .unwrap_or_else(|| panic!("no class named `{name}` in program"))
    }

    pub fn find_method<'a>(
        &self,
        class: &'a ClassDeclaration,
        name: &str,
    ) -> &'a MethodDeclaration {
        let wanted = self.id(name);
        class
            .members
            .iter()
            .find_map(|member| match member {
                ClassMember::Method(method) if method.name.node == wanted => Some(method),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no method named `{name}`"))
    }

    /// All property names declared by `class`, in declaration order.
    pub fn prop_names(&self, class: &ClassDeclaration) -> Vec<String> {
        class
            .members
            .iter()
            .filter_map(|member| match member {
                ClassMember::Property(prop) => Some(prop),
                _ => None,
            })
            .flat_map(|prop| prop.entries.iter())
            .map(|entry| self.resolve(entry.name.node))
            .collect()
    }
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn find_class_in(stmts: &[Statement], wanted: StringId) -> Option<&ClassDeclaration> {
    for stmt in stmts {
        let found = match stmt {
            Statement::Class(class) => {
                if class.name.node == wanted {
                    return Some(class);
                }
                class.members.iter().find_map(|member| match member {
                    ClassMember::Method(method) => {
                        find_class_in(&method.body.statements, wanted)
                    }
                    _ => None,
                })
            }
            Statement::Namespace(ns) => find_class_in(&ns.body.statements, wanted),
            Statement::Function(func) => find_class_in(&func.body.statements, wanted),
            Statement::If(if_stmt) => find_class_in(&if_stmt.then_block.statements, wanted)
                .or_else(|| {
                    if_stmt.else_ifs.iter().find_map(|else_if| {
                        find_class_in(&else_if.block.statements, wanted)
                    })
                })
                .or_else(|| {
                    if_stmt
                        .else_block
                        .as_ref()
                        .and_then(|block| find_class_in(&block.statements, wanted))
                }),
            Statement::While(while_stmt) => find_class_in(&while_stmt.body.statements, wanted),
            Statement::Block(block) => find_class_in(&block.statements, wanted),
            Statement::Return(_) | Statement::Echo(_) | Statement::Expression(_) => None,
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

/// The literal member name of a property or static-property fetch.
pub fn fetch_name(expr: &Expression) -> Option<StringId> {
    match &expr.kind {
        ExpressionKind::PropertyFetch(fetch) => fetch.name.as_literal(),
        ExpressionKind::StaticPropertyFetch(fetch) => fetch.name.as_literal(),
        _ => None,
    }
}

/// The returned expression of a `return` statement.
pub fn return_value(stmt: &Statement) -> Option<&Expression> {
    match stmt {
        Statement::Return(ret) => ret.value.as_ref(),
        _ => None,
    }
}
