//! `if condition then a else b`.

use crate::expression::type_checker::{assert_boolean, common_type};
use crate::expression::{
    ExpressionResult, ExpressionVisitor, Function, Node, ResolvableExpression,
};
use crate::script::{Expr, Span};

/// The condition must be Boolean and both branches must share a type
pub fn visit_if(
    visitor: &ExpressionVisitor<'_>,
    condition: &Expr,
    then_branch: &Expr,
    else_branch: &Expr,
    span: &Span,
) -> ExpressionResult<ResolvableExpression> {
    let condition_expr = assert_boolean(visitor.visit(condition)?, condition)?;
    let then_expr = visitor.visit(then_branch)?;
    let else_expr = visitor.visit(else_branch)?;
    let data_type = common_type(&[&then_expr, &else_expr], span)?;

    Ok(ResolvableExpression::with_type(
        data_type,
        Node::Call(Function::If {
            condition: Box::new(condition_expr),
            then_branch: Box::new(then_expr),
            else_branch: Box::new(else_expr),
        }),
    ))
}
