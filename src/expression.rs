//! Typed expression trees.
//!
//! This module provides:
//! - Typed expression nodes built through [`ResolvableExpression::with_type`]
//! - A visitor resolving syntax nodes against a symbol table
//! - Operator and function families registered in a dispatch table
//! - Evaluation of built trees against a runtime context

pub mod context;
pub mod error;
pub mod eval;
pub mod expr;
pub mod functions;
pub mod operator;
pub mod type_checker;
pub mod visitor;

pub use context::{Context, SymbolTable};
pub use error::{EvaluationError, EvaluationResult, ExpressionError, ExpressionResult};
pub use eval::{evaluate_expression, ExpressionEvaluator};
pub use expr::{Function, Node, ResolvableExpression};
pub use functions::FunctionTable;
pub use operator::{BinaryOperator, UnaryOperator};
pub use visitor::ExpressionVisitor;

use crate::script::Expr;

/// Resolve a syntax node with the built-in functions
pub fn resolve_expression(
    expr: &Expr,
    symbols: &SymbolTable,
) -> ExpressionResult<ResolvableExpression> {
    let resolved = ExpressionVisitor::new(symbols, FunctionTable::standard_ref()).visit(expr)?;
    log::trace!("resolved `{}` as {}", expr.text(), resolved.data_type());
    Ok(resolved)
}
