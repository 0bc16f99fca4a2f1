//! Expression nodes, including the two member-access variants the
//! scrambling passes rewrite.

use crate::interner::StringId;
use crate::span::{Span, Spanned};

#[derive(Debug, Clone)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone)]
pub enum ExpressionKind {
    /// `$name`
    Variable(StringId),
    /// `expr->name` — instance-style member access.
    PropertyFetch(Box<PropertyFetch>),
    /// `Target::$name` — class-scoped member access.
    StaticPropertyFetch(Box<StaticPropertyFetch>),
    /// `expr->name(args)`
    MethodCall(Box<MethodCall>),
    /// `Target::name(args)`
    StaticCall(Box<StaticCall>),
    /// `name(args)`
    FunctionCall(Box<FunctionCall>),
    /// `new Target(args)`
    New(Box<NewExpression>),
    Assign(Box<AssignExpression>),
    Binary(Box<BinaryExpression>),
    StringLiteral(StringId),
    IntLiteral(i64),
    BoolLiteral(bool),
    Null,
}

/// Instance-style access, `$obj->prop`.
///
/// The target is an arbitrary expression; only a bare `$this` target can be
/// proven to reference the enclosing class (see [`crate::scramble::locality`]).
#[derive(Debug, Clone)]
pub struct PropertyFetch {
    pub target: Expression,
    pub name: MemberName,
    pub meta: FetchMeta,
}

/// Class-scoped access, `Target::$prop`.
#[derive(Debug, Clone)]
pub struct StaticPropertyFetch {
    pub class: StaticTarget,
    pub name: MemberName,
    pub meta: FetchMeta,
}

/// An accessed member name: either a literal identifier or an expression
/// computed at runtime (`$obj->{$name}`), which is never rewritten.
#[derive(Debug, Clone)]
pub enum MemberName {
    Literal(Spanned<StringId>),
    Dynamic(Box<Expression>),
}

impl MemberName {
    /// The literal identifier, or `None` for a runtime-computed name.
    pub fn as_literal(&self) -> Option<StringId> {
        match self {
            MemberName::Literal(name) => Some(name.node),
            MemberName::Dynamic(_) => None,
        }
    }
}

/// The syntactic target of a class-scoped access or instantiation.
#[derive(Debug, Clone)]
pub enum StaticTarget {
    /// `self::` — the innermost enclosing class, regardless of inheritance.
    SelfRef(Span),
    /// `parent::`
    Parent(Span),
    /// `static::` — late static binding, resolved at runtime.
    LateStatic(Span),
    /// A literal, possibly namespaced class name.
    Name(Name),
    /// A runtime-evaluated target such as `$var::`.
    Dynamic(Box<Expression>),
}

/// A possibly-namespaced name as written in the source.
#[derive(Debug, Clone)]
pub struct Name {
    pub parts: Vec<StringId>,
    /// Written with a leading `\`.
    pub fully_qualified: bool,
    /// Fully-qualified form, stamped by the resolve pass.
    pub resolved: Option<StringId>,
    pub span: Span,
}

impl Name {
    pub fn new(parts: Vec<StringId>, fully_qualified: bool, span: Span) -> Self {
        Self {
            parts,
            fully_qualified,
            resolved: None,
            span,
        }
    }
}

/// Per-node side channel filled in by the resolve pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchMeta {
    /// The innermost class declaration lexically enclosing this access, or
    /// `None` for accesses outside any class body.
    pub enclosing_class: Option<EnclosingClass>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnclosingClass {
    /// Fully-qualified name of the enclosing class.
    pub fqcn: StringId,
}

#[derive(Debug, Clone)]
pub struct MethodCall {
    pub target: Expression,
    pub name: MemberName,
    pub args: Vec<Expression>,
}

#[derive(Debug, Clone)]
pub struct StaticCall {
    pub class: StaticTarget,
    pub name: MemberName,
    pub args: Vec<Expression>,
}

#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub name: Name,
    pub args: Vec<Expression>,
}

#[derive(Debug, Clone)]
pub struct NewExpression {
    pub class: StaticTarget,
    pub args: Vec<Expression>,
}

#[derive(Debug, Clone)]
pub struct AssignExpression {
    pub target: Expression,
    pub value: Expression,
}

#[derive(Debug, Clone)]
pub struct BinaryExpression {
    pub op: BinaryOp,
    pub lhs: Expression,
    pub rhs: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Concat,
    Eq,
    NotEq,
    Lt,
    Gt,
    And,
    Or,
}
