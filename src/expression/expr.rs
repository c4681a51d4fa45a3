//! Typed expression tree definitions.

use crate::expression::operator::{BinaryOperator, UnaryOperator};
use crate::types::{DataType, Value};

/// A statically typed, lazily evaluated expression.
///
/// The declared type is fixed when the node is built and never re-derived
/// during evaluation. Nodes own their operands and are immutable, so one
/// tree can be evaluated any number of times, from any thread, against
/// independent contexts.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvableExpression {
    data_type: DataType,
    node: Node,
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal constant value
    Constant(Value),

    /// Variable looked up in the evaluation context
    Variable(String),

    /// Unary operation
    Unary {
        op: UnaryOperator,
        operand: Box<ResolvableExpression>,
    },

    /// Binary operation
    Binary {
        op: BinaryOperator,
        left: Box<ResolvableExpression>,
        right: Box<ResolvableExpression>,
    },

    /// Function taking more than two operands, or optional ones
    Call(Function),
}

/// Functions with three or more (possibly optional) operands
#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    /// Inclusive range test
    Between {
        operand: Box<ResolvableExpression>,
        from: Box<ResolvableExpression>,
        to: Box<ResolvableExpression>,
    },

    /// 0-based start (inclusive) and end (exclusive) character offsets
    Substr {
        operand: Box<ResolvableExpression>,
        start: Option<Box<ResolvableExpression>>,
        end: Option<Box<ResolvableExpression>>,
    },

    /// Regular expression replacement of every match
    Replace {
        operand: Box<ResolvableExpression>,
        pattern: Box<ResolvableExpression>,
        replacement: Option<Box<ResolvableExpression>>,
    },

    /// 1-based position of the n-th occurrence of a pattern, 0 if absent
    Instr {
        operand: Box<ResolvableExpression>,
        pattern: Box<ResolvableExpression>,
        start: Option<Box<ResolvableExpression>>,
        occurrence: Option<Box<ResolvableExpression>>,
    },

    If {
        condition: Box<ResolvableExpression>,
        then_branch: Box<ResolvableExpression>,
        else_branch: Box<ResolvableExpression>,
    },
}

impl ResolvableExpression {
    /// Bind a declared type to the node computing it.
    ///
    /// Every operator builds its result through this constructor.
    pub fn with_type(data_type: DataType, node: Node) -> Self {
        Self { data_type, node }
    }

    /// Create a constant typed after its value
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::with_type(value.data_type(), Node::Constant(value))
    }

    /// Create a variable reference of a known type
    pub fn variable(name: impl Into<String>, data_type: DataType) -> Self {
        Self::with_type(data_type, Node::Variable(name.into()))
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn node(&self) -> &Node {
        &self.node
    }
}

impl Node {
    /// Create a unary operation node
    pub fn unary(op: UnaryOperator, operand: ResolvableExpression) -> Self {
        Node::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create a binary operation node
    pub fn binary(op: BinaryOperator, left: ResolvableExpression, right: ResolvableExpression) -> Self {
        Node::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_trees_are_shareable() {
        assert_send_sync::<ResolvableExpression>();
    }

    #[test]
    fn test_constant() {
        let expr = ResolvableExpression::constant(42);
        assert_eq!(expr.data_type(), DataType::Integer);
        assert_eq!(expr.node(), &Node::Constant(Value::Integer(42)));

        let expr = ResolvableExpression::constant(1.5);
        assert_eq!(expr.data_type(), DataType::Number);
    }

    #[test]
    fn test_with_type() {
        let expr = ResolvableExpression::with_type(
            DataType::Number,
            Node::binary(
                BinaryOperator::Div,
                ResolvableExpression::constant(1),
                ResolvableExpression::variable("n", DataType::Integer),
            ),
        );
        assert_eq!(expr.data_type(), DataType::Number);
        assert!(matches!(
            expr.node(),
            Node::Binary {
                op: BinaryOperator::Div,
                ..
            }
        ));

        let expr = ResolvableExpression::with_type(
            DataType::Boolean,
            Node::unary(UnaryOperator::IsNull, ResolvableExpression::constant(Value::Null)),
        );
        assert_eq!(expr.data_type(), DataType::Boolean);
    }
}
