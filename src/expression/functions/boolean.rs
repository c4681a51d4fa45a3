//! Logical operators: `and`, `or`, `xor`, `not`.

use crate::expression::functions::FunctionTable;
use crate::expression::type_checker::assert_boolean;
use crate::expression::{
    BinaryOperator, ExpressionResult, ExpressionVisitor, Node, ResolvableExpression,
    UnaryOperator,
};
use crate::script::{Expr, Span};
use crate::types::DataType;

pub fn register(table: &mut FunctionTable) {
    table.register_unary(UnaryOperator::Not, visit_not);
    table.register_binary(BinaryOperator::And, visit_logical);
    table.register_binary(BinaryOperator::Or, visit_logical);
    table.register_binary(BinaryOperator::Xor, visit_logical);
}

fn visit_not(
    visitor: &ExpressionVisitor<'_>,
    op: UnaryOperator,
    operand: &Expr,
    _span: &Span,
) -> ExpressionResult<ResolvableExpression> {
    let resolved = assert_boolean(visitor.visit(operand)?, operand)?;
    let data_type = op
        .output_type(resolved.data_type())
        .unwrap_or(DataType::Boolean);
    Ok(ResolvableExpression::with_type(
        data_type,
        Node::unary(op, resolved),
    ))
}

/// Both operands are resolved before either is checked, left first.
fn visit_logical(
    visitor: &ExpressionVisitor<'_>,
    op: BinaryOperator,
    left: &Expr,
    right: &Expr,
    _span: &Span,
) -> ExpressionResult<ResolvableExpression> {
    let left_expr = visitor.visit(left)?;
    let right_expr = visitor.visit(right)?;
    let left_expr = assert_boolean(left_expr, left)?;
    let right_expr = assert_boolean(right_expr, right)?;
    let data_type = op
        .output_type(left_expr.data_type(), right_expr.data_type())
        .unwrap_or(DataType::Boolean);
    Ok(ResolvableExpression::with_type(
        data_type,
        Node::binary(op, left_expr, right_expr),
    ))
}

#[cfg(test)]
mod tests {
    use crate::expression::functions::test_support::{error, eval, resolve_with};
    use crate::expression::{Context, ExpressionError, SymbolTable};
    use crate::types::{DataType, Value};

    #[test]
    fn test_truth_tables() {
        let cases = [
            (true, true, true, true, false),
            (true, false, false, true, true),
            (false, true, false, true, true),
            (false, false, false, false, false),
        ];
        for (a, b, and, or, xor) in cases {
            assert_eq!(eval(&format!("{} and {}", a, b)), Value::Boolean(and));
            assert_eq!(eval(&format!("{} or {}", a, b)), Value::Boolean(or));
            assert_eq!(eval(&format!("{} xor {}", a, b)), Value::Boolean(xor));
        }

        assert_eq!(eval("not true"), Value::Boolean(false));
        assert_eq!(eval("not false"), Value::Boolean(true));
    }

    #[test]
    fn test_invalid_operands() {
        assert_eq!(
            error("1 and 2"),
            "invalid type Integer, expected 1 to be Boolean"
        );
        assert_eq!(
            error("true or 2"),
            "invalid type Integer, expected 2 to be Boolean"
        );
        assert_eq!(
            error("not 888"),
            "invalid type Integer, expected 888 to be Boolean"
        );
        assert_eq!(
            error("\"a\" xor false"),
            "invalid type String, expected \"a\" to be Boolean"
        );
    }

    #[test]
    fn test_variables() {
        let symbols = SymbolTable::new()
            .with("a", DataType::Boolean)
            .with("n", DataType::Integer);

        let expr = resolve_with("a and not a", &symbols).unwrap();
        assert_eq!(expr.data_type(), DataType::Boolean);
        let context = Context::new().with("a", true);
        assert_eq!(expr.resolve(&context).unwrap(), Value::Boolean(false));

        let err = resolve_with("a or n", &symbols).unwrap_err();
        assert!(matches!(
            err,
            ExpressionError::InvalidType {
                expected: DataType::Boolean,
                actual: DataType::Integer,
                ..
            }
        ));
        assert_eq!(err.span().text, "n");
    }

    #[test]
    fn test_null_operands() {
        let symbols = SymbolTable::new().with("a", DataType::Boolean);
        let expr = resolve_with("a and false", &symbols).unwrap();
        let context = Context::new().with("a", Value::Null);
        assert_eq!(expr.resolve(&context).unwrap(), Value::Boolean(false));

        let expr = resolve_with("a or false", &symbols).unwrap();
        assert_eq!(expr.resolve(&context).unwrap(), Value::Null);
    }
}
