//! Comparison operators, `between`, `match_characters` and `isnull`.

use crate::expression::functions::{check_arity, FunctionTable};
use crate::expression::type_checker::{assert_string, common_type};
use crate::expression::{
    BinaryOperator, ExpressionError, ExpressionResult, ExpressionVisitor, Function, Node,
    ResolvableExpression, UnaryOperator,
};
use crate::script::{Expr, Span};
use crate::types::DataType;

pub fn register(table: &mut FunctionTable) {
    for op in [
        BinaryOperator::Eq,
        BinaryOperator::Ne,
        BinaryOperator::Lt,
        BinaryOperator::Le,
        BinaryOperator::Gt,
        BinaryOperator::Ge,
    ] {
        table.register_binary(op, visit_comparison);
    }
    table.register_call("between", visit_between);
    table.register_call("match_characters", visit_match);
    table.register_call("isnull", visit_isnull);
}

/// Operands are widened to a common type; orderings also need it to be
/// numeric or string.
fn visit_comparison(
    visitor: &ExpressionVisitor<'_>,
    op: BinaryOperator,
    left: &Expr,
    right: &Expr,
    span: &Span,
) -> ExpressionResult<ResolvableExpression> {
    let left_expr = visitor.visit(left)?;
    let right_expr = visitor.visit(right)?;
    let common = common_type(&[&left_expr, &right_expr], span)?;

    let data_type = op
        .output_type(left_expr.data_type(), right_expr.data_type())
        .ok_or_else(|| ExpressionError::InvalidType {
            expected: DataType::Number,
            actual: common,
            span: left.span.clone(),
        })?;

    Ok(ResolvableExpression::with_type(
        data_type,
        Node::binary(op, left_expr, right_expr),
    ))
}

/// `between(operand, from, to)` over a numeric common type
fn visit_between(
    visitor: &ExpressionVisitor<'_>,
    name: &str,
    args: &[Expr],
    span: &Span,
) -> ExpressionResult<ResolvableExpression> {
    check_arity(name, args, 3, 3, span)?;

    let operand = visitor.visit(&args[0])?;
    let from = visitor.visit(&args[1])?;
    let to = visitor.visit(&args[2])?;

    let common = common_type(&[&operand, &from, &to], span)?;
    if !common.is_numeric() {
        return Err(ExpressionError::InvalidType {
            expected: DataType::Number,
            actual: common,
            span: args[0].span.clone(),
        });
    }

    Ok(ResolvableExpression::with_type(
        DataType::Boolean,
        Node::Call(Function::Between {
            operand: Box::new(operand),
            from: Box::new(from),
            to: Box::new(to),
        }),
    ))
}

/// `match_characters(operand, pattern)`: full match of a regular expression
fn visit_match(
    visitor: &ExpressionVisitor<'_>,
    name: &str,
    args: &[Expr],
    span: &Span,
) -> ExpressionResult<ResolvableExpression> {
    check_arity(name, args, 2, 2, span)?;

    let operand = visitor.visit(&args[0])?;
    let pattern = visitor.visit(&args[1])?;
    let operand = assert_string(operand, &args[0])?;
    let pattern = assert_string(pattern, &args[1])?;

    Ok(ResolvableExpression::with_type(
        DataType::Boolean,
        Node::binary(BinaryOperator::Match, operand, pattern),
    ))
}

/// `isnull(operand)` accepts any type
fn visit_isnull(
    visitor: &ExpressionVisitor<'_>,
    name: &str,
    args: &[Expr],
    span: &Span,
) -> ExpressionResult<ResolvableExpression> {
    check_arity(name, args, 1, 1, span)?;

    let operand = visitor.visit(&args[0])?;
    Ok(ResolvableExpression::with_type(
        DataType::Boolean,
        Node::unary(UnaryOperator::IsNull, operand),
    ))
}

#[cfg(test)]
mod tests {
    use crate::expression::functions::test_support::{error, eval, resolve, resolve_with};
    use crate::expression::{Context, ExpressionError, SymbolTable};
    use crate::types::{DataType, Value};

    #[test]
    fn test_comparisons() {
        assert_eq!(eval("1 = 1.0"), Value::Boolean(true));
        assert_eq!(eval("1 <> 2"), Value::Boolean(true));
        assert_eq!(eval("2 < 1.5"), Value::Boolean(false));
        assert_eq!(eval("\"a\" <= \"b\""), Value::Boolean(true));
        assert_eq!(eval("3 >= 3"), Value::Boolean(true));
        assert_eq!(eval("true = false"), Value::Boolean(false));
    }

    #[test]
    fn test_comparison_type_errors() {
        assert_eq!(error("1 = \"1\""), "conflicting types: [Integer, String]");
        assert!(matches!(
            resolve("true < false"),
            Err(ExpressionError::InvalidType {
                actual: DataType::Boolean,
                ..
            })
        ));
    }

    #[test]
    fn test_between() {
        assert_eq!(eval("between(2, 1, 3)"), Value::Boolean(true));
        assert_eq!(eval("between(1, 1, 3)"), Value::Boolean(true));
        assert_eq!(eval("between(3.5, 1, 3)"), Value::Boolean(false));
        assert_eq!(eval("between(2, 1.5, 2.5)"), Value::Boolean(true));

        let expr = resolve("between(2, 1, 3)").unwrap();
        assert_eq!(expr.data_type(), DataType::Boolean);
    }

    #[test]
    fn test_between_type_errors() {
        assert_eq!(
            error("between(1, \"a\", 3)"),
            "conflicting types: [Integer, String]"
        );
        assert_eq!(
            error("between(\"b\", \"a\", \"c\")"),
            "invalid type String, expected \"b\" to be Number"
        );
        assert!(matches!(
            resolve("between(1, 2)"),
            Err(ExpressionError::FunctionArgumentCount { actual: 2, .. })
        ));
    }

    #[test]
    fn test_match_characters() {
        assert_eq!(eval("match_characters(\"abc\", \"a.c\")"), Value::Boolean(true));
        assert_eq!(eval("match_characters(\"abcd\", \"a.c\")"), Value::Boolean(false));
        assert_eq!(
            eval("match_characters(\"abc123\", \"[a-z]+[0-9]+\")"),
            Value::Boolean(true)
        );
        assert_eq!(
            eval("match_characters(\"abc123\", \"[a-z]+\")"),
            Value::Boolean(false)
        );
        assert_eq!(
            error("match_characters(1, \"[0-9]\")"),
            "invalid type Integer, expected 1 to be String"
        );
    }

    #[test]
    fn test_isnull() {
        let symbols = SymbolTable::new().with("x", DataType::Integer);
        let expr = resolve_with("isnull(x)", &symbols).unwrap();
        assert_eq!(expr.data_type(), DataType::Boolean);

        let context = Context::new().with("x", Value::Null);
        assert_eq!(expr.resolve(&context).unwrap(), Value::Boolean(true));
        let context = Context::new().with("x", 4);
        assert_eq!(expr.resolve(&context).unwrap(), Value::Boolean(false));

        assert_eq!(eval("isnull(null)"), Value::Boolean(true));
    }
}
