//! Arithmetic operators: `+ - * /` and unary sign.

use crate::expression::functions::FunctionTable;
use crate::expression::type_checker::assert_numeric;
use crate::expression::{
    BinaryOperator, ExpressionResult, ExpressionVisitor, Node, ResolvableExpression,
    UnaryOperator,
};
use crate::script::{Expr, Span};
use crate::types::DataType;

pub fn register(table: &mut FunctionTable) {
    for op in [
        BinaryOperator::Add,
        BinaryOperator::Sub,
        BinaryOperator::Mul,
        BinaryOperator::Div,
    ] {
        table.register_binary(op, visit_arithmetic);
    }
    table.register_unary(UnaryOperator::Plus, visit_sign);
    table.register_unary(UnaryOperator::Minus, visit_sign);
}

/// Integer operands stay Integer except for division, anything with a
/// Number operand is widened to Number.
fn visit_arithmetic(
    visitor: &ExpressionVisitor<'_>,
    op: BinaryOperator,
    left: &Expr,
    right: &Expr,
    _span: &Span,
) -> ExpressionResult<ResolvableExpression> {
    let left_expr = visitor.visit(left)?;
    let right_expr = visitor.visit(right)?;
    let left_expr = assert_numeric(left_expr, left)?;
    let right_expr = assert_numeric(right_expr, right)?;

    let data_type = op
        .output_type(left_expr.data_type(), right_expr.data_type())
        .unwrap_or(DataType::Number);
    Ok(ResolvableExpression::with_type(
        data_type,
        Node::binary(op, left_expr, right_expr),
    ))
}

fn visit_sign(
    visitor: &ExpressionVisitor<'_>,
    op: UnaryOperator,
    operand: &Expr,
    _span: &Span,
) -> ExpressionResult<ResolvableExpression> {
    let resolved = assert_numeric(visitor.visit(operand)?, operand)?;
    Ok(ResolvableExpression::with_type(
        resolved.data_type(),
        Node::unary(op, resolved),
    ))
}
