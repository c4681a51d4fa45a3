//! Static type checks shared by the function visitors.

use crate::expression::{ExpressionError, ExpressionResult, ResolvableExpression};
use crate::script::{Expr, Span};
use crate::types::DataType;

/// Check that an operand can be used where `expected` is required.
///
/// `Integer` operands are accepted where `Number` is expected.
pub fn assert_type(
    expr: ResolvableExpression,
    expected: DataType,
    syntax: &Expr,
) -> ExpressionResult<ResolvableExpression> {
    if expr.data_type().widens_to(expected) {
        Ok(expr)
    } else {
        Err(ExpressionError::InvalidType {
            expected,
            actual: expr.data_type(),
            span: syntax.span.clone(),
        })
    }
}

pub fn assert_boolean(
    expr: ResolvableExpression,
    syntax: &Expr,
) -> ExpressionResult<ResolvableExpression> {
    assert_type(expr, DataType::Boolean, syntax)
}

pub fn assert_string(
    expr: ResolvableExpression,
    syntax: &Expr,
) -> ExpressionResult<ResolvableExpression> {
    assert_type(expr, DataType::String, syntax)
}

pub fn assert_integer(
    expr: ResolvableExpression,
    syntax: &Expr,
) -> ExpressionResult<ResolvableExpression> {
    assert_type(expr, DataType::Integer, syntax)
}

/// Integer or Number operand
pub fn assert_numeric(
    expr: ResolvableExpression,
    syntax: &Expr,
) -> ExpressionResult<ResolvableExpression> {
    assert_type(expr, DataType::Number, syntax)
}

/// Common type of operands that must share a type family
pub fn common_type(exprs: &[&ResolvableExpression], span: &Span) -> ExpressionResult<DataType> {
    let types: Vec<DataType> = exprs.iter().map(|e| e.data_type()).collect();
    DataType::widen_all(&types).ok_or_else(|| ExpressionError::conflicting(&types, span))
}
