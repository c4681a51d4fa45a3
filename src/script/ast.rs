// Script Abstract Syntax Tree (AST) definitions

use super::span::Span;
use crate::expression::{BinaryOperator, UnaryOperator};

/// A parsed script: a sequence of assignments
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub statements: Vec<Assignment>,
}

/// `target := expression;`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: String,
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
}

/// Syntax node with the source range it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Variable(String),
    Parenthesized(Box<Expr>),
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    /// `_` standing for an omitted optional argument
    Omitted,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The source text of this node
    pub fn text(&self) -> &str {
        &self.span.text
    }

    pub fn is_omitted(&self) -> bool {
        matches!(self.kind, ExprKind::Omitted)
    }
}
