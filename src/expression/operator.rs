//! Operator definitions for expressions.

use crate::types::DataType;

/// Binary operators supported in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,
    Xor,

    // String
    Concat,
    Match,
}

impl BinaryOperator {
    /// Get the output type of this operator given input types
    pub fn output_type(&self, left: DataType, right: DataType) -> Option<DataType> {
        match self {
            BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul => {
                match left.widen(right)? {
                    common if common.is_numeric() => Some(common),
                    _ => None,
                }
            }

            // Division always produces a real number
            BinaryOperator::Div => match left.widen(right)? {
                common if common.is_numeric() => Some(DataType::Number),
                _ => None,
            },

            BinaryOperator::Eq | BinaryOperator::Ne => match left.widen(right)? {
                DataType::Null => None,
                _ => Some(DataType::Boolean),
            },

            BinaryOperator::Lt | BinaryOperator::Le | BinaryOperator::Gt | BinaryOperator::Ge => {
                match left.widen(right)? {
                    common if common.is_numeric() || common.is_string() => Some(DataType::Boolean),
                    _ => None,
                }
            }

            BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Xor => {
                (left.is_boolean() && right.is_boolean()).then_some(DataType::Boolean)
            }

            BinaryOperator::Concat => match (left, right) {
                (DataType::String, DataType::String) => Some(DataType::String),
                _ => None,
            },

            BinaryOperator::Match => match (left, right) {
                (DataType::String, DataType::String) => Some(DataType::Boolean),
                _ => None,
            },
        }
    }

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Eq => "=",
            BinaryOperator::Ne => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Xor => "xor",
            BinaryOperator::Concat => "||",
            BinaryOperator::Match => "match_characters",
        }
    }
}

/// Unary operators supported in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    // Logical
    Not,

    // NULL check
    IsNull,

    // Arithmetic
    Plus,
    Minus,

    // String
    Trim,
    Ltrim,
    Rtrim,
    Upper,
    Lower,
    Length,
}

impl UnaryOperator {
    /// Get the output type of this operator given input type
    pub fn output_type(&self, operand: DataType) -> Option<DataType> {
        match self {
            UnaryOperator::Not => operand.is_boolean().then_some(DataType::Boolean),

            // NULL checks always return boolean regardless of input type
            UnaryOperator::IsNull => Some(DataType::Boolean),

            UnaryOperator::Plus | UnaryOperator::Minus => match operand {
                DataType::Integer | DataType::Number => Some(operand),
                _ => None,
            },

            UnaryOperator::Trim
            | UnaryOperator::Ltrim
            | UnaryOperator::Rtrim
            | UnaryOperator::Upper
            | UnaryOperator::Lower => match operand {
                DataType::String => Some(DataType::String),
                _ => None,
            },

            UnaryOperator::Length => match operand {
                DataType::String => Some(DataType::Integer),
                _ => None,
            },
        }
    }

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "not",
            UnaryOperator::IsNull => "isnull",
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::Trim => "trim",
            UnaryOperator::Ltrim => "ltrim",
            UnaryOperator::Rtrim => "rtrim",
            UnaryOperator::Upper => "upper",
            UnaryOperator::Lower => "lower",
            UnaryOperator::Length => "length",
        }
    }
}
