//! String functions and the `||` concatenation operator.

use crate::expression::functions::{check_arity, FunctionTable};
use crate::expression::type_checker::{assert_integer, assert_string};
use crate::expression::{
    BinaryOperator, ExpressionError, ExpressionResult, ExpressionVisitor, Function, Node,
    ResolvableExpression, UnaryOperator,
};
use crate::script::{Expr, Span};
use crate::types::DataType;

/// Single-operand functions and their aliases
const STRING_FUNCTIONS: &[(&str, UnaryOperator)] = &[
    ("trim", UnaryOperator::Trim),
    ("ltrim", UnaryOperator::Ltrim),
    ("rtrim", UnaryOperator::Rtrim),
    ("upper", UnaryOperator::Upper),
    ("ucase", UnaryOperator::Upper),
    ("lower", UnaryOperator::Lower),
    ("lcase", UnaryOperator::Lower),
    ("length", UnaryOperator::Length),
    ("len", UnaryOperator::Length),
];

pub fn register(table: &mut FunctionTable) {
    for (name, _) in STRING_FUNCTIONS {
        table.register_call(name, visit_string_call);
    }
    table.register_call("substr", visit_substr);
    table.register_call("replace", visit_replace);
    table.register_call("instr", visit_instr);
    table.register_binary(BinaryOperator::Concat, visit_concat);
}

fn string_operator(name: &str) -> Option<UnaryOperator> {
    STRING_FUNCTIONS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, op)| *op)
}

/// `trim`, `upper`, `length` and the other single-operand functions
pub fn visit_string_call(
    visitor: &ExpressionVisitor<'_>,
    name: &str,
    args: &[Expr],
    span: &Span,
) -> ExpressionResult<ResolvableExpression> {
    let name = name.to_lowercase();
    let op = string_operator(&name).ok_or_else(|| ExpressionError::UnknownFunction {
        name: name.clone(),
        span: span.clone(),
    })?;
    check_arity(&name, args, 1, 1, span)?;

    let operand = assert_string(visitor.visit(&args[0])?, &args[0])?;
    let data_type = op
        .output_type(operand.data_type())
        .unwrap_or(DataType::String);
    Ok(ResolvableExpression::with_type(
        data_type,
        Node::unary(op, operand),
    ))
}

/// Resolve an optional Integer argument at `index`
fn optional_integer(
    visitor: &ExpressionVisitor<'_>,
    args: &[Expr],
    index: usize,
) -> ExpressionResult<Option<Box<ResolvableExpression>>> {
    let Some(syntax) = args.get(index) else {
        return Ok(None);
    };
    match visitor.visit_optional(Some(syntax))? {
        Some(resolved) => Ok(Some(Box::new(assert_integer(resolved, syntax)?))),
        None => Ok(None),
    }
}

/// `substr(operand [, start [, end]])`
fn visit_substr(
    visitor: &ExpressionVisitor<'_>,
    name: &str,
    args: &[Expr],
    span: &Span,
) -> ExpressionResult<ResolvableExpression> {
    check_arity(name, args, 1, 3, span)?;

    let operand = assert_string(visitor.visit(&args[0])?, &args[0])?;
    let start = optional_integer(visitor, args, 1)?;
    let end = optional_integer(visitor, args, 2)?;

    Ok(ResolvableExpression::with_type(
        DataType::String,
        Node::Call(Function::Substr {
            operand: Box::new(operand),
            start,
            end,
        }),
    ))
}

/// `replace(operand, pattern [, replacement])`
fn visit_replace(
    visitor: &ExpressionVisitor<'_>,
    name: &str,
    args: &[Expr],
    span: &Span,
) -> ExpressionResult<ResolvableExpression> {
    check_arity(name, args, 2, 3, span)?;

    let operand = assert_string(visitor.visit(&args[0])?, &args[0])?;
    let pattern = assert_string(visitor.visit(&args[1])?, &args[1])?;
    let replacement = match args.get(2) {
        Some(syntax) => match visitor.visit_optional(Some(syntax))? {
            Some(resolved) => Some(Box::new(assert_string(resolved, syntax)?)),
            None => None,
        },
        None => None,
    };

    Ok(ResolvableExpression::with_type(
        DataType::String,
        Node::Call(Function::Replace {
            operand: Box::new(operand),
            pattern: Box::new(pattern),
            replacement,
        }),
    ))
}

/// `instr(operand, pattern [, start [, occurrence]])`
fn visit_instr(
    visitor: &ExpressionVisitor<'_>,
    name: &str,
    args: &[Expr],
    span: &Span,
) -> ExpressionResult<ResolvableExpression> {
    check_arity(name, args, 2, 4, span)?;

    let operand = assert_string(visitor.visit(&args[0])?, &args[0])?;
    let pattern = assert_string(visitor.visit(&args[1])?, &args[1])?;
    let start = optional_integer(visitor, args, 2)?;
    let occurrence = optional_integer(visitor, args, 3)?;

    Ok(ResolvableExpression::with_type(
        DataType::Integer,
        Node::Call(Function::Instr {
            operand: Box::new(operand),
            pattern: Box::new(pattern),
            start,
            occurrence,
        }),
    ))
}

fn visit_concat(
    visitor: &ExpressionVisitor<'_>,
    op: BinaryOperator,
    left: &Expr,
    right: &Expr,
    _span: &Span,
) -> ExpressionResult<ResolvableExpression> {
    let left_expr = visitor.visit(left)?;
    let right_expr = visitor.visit(right)?;
    let left_expr = assert_string(left_expr, left)?;
    let right_expr = assert_string(right_expr, right)?;
    Ok(ResolvableExpression::with_type(
        DataType::String,
        Node::binary(op, left_expr, right_expr),
    ))
}
