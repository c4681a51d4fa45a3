//! Error types for expression construction and evaluation.

use crate::script::Span;
use crate::types::DataType;
use thiserror::Error;

/// Semantic errors raised while building a typed expression tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// Identifier absent from the symbol table
    #[error("undefined variable {name}")]
    UndefinedVariable { name: String, span: Span },

    /// Operand type does not match the operator signature
    #[error("invalid type {actual}, expected {} to be {expected}", .span.text)]
    InvalidType {
        expected: DataType,
        actual: DataType,
        span: Span,
    },

    /// Operands that must share a type family do not
    #[error("conflicting types: [{}]", join_types(.types))]
    ConflictingTypes { types: Vec<DataType>, span: Span },

    #[error("unknown function {name}")]
    UnknownFunction { name: String, span: Span },

    #[error("function {function} expects {expected} arguments, got {actual}")]
    FunctionArgumentCount {
        function: String,
        expected: String,
        actual: usize,
        span: Span,
    },

    /// `_` used where a value is required
    #[error("missing operand at {span}")]
    MissingOperand { span: Span },

    /// Expression nests deeper than the configured limit
    #[error("expression nested deeper than {limit} levels at {span}")]
    NestingTooDeep { limit: usize, span: Span },
}

impl ExpressionError {
    /// Build a conflicting-types error listing each distinct type once
    pub fn conflicting(types: &[DataType], span: &Span) -> Self {
        let mut distinct: Vec<DataType> = Vec::with_capacity(types.len());
        for data_type in types {
            if !distinct.contains(data_type) {
                distinct.push(*data_type);
            }
        }
        ExpressionError::ConflictingTypes {
            types: distinct,
            span: span.clone(),
        }
    }

    /// Source location the error points at
    pub fn span(&self) -> &Span {
        match self {
            ExpressionError::UndefinedVariable { span, .. }
            | ExpressionError::InvalidType { span, .. }
            | ExpressionError::ConflictingTypes { span, .. }
            | ExpressionError::UnknownFunction { span, .. }
            | ExpressionError::FunctionArgumentCount { span, .. }
            | ExpressionError::MissingOperand { span }
            | ExpressionError::NestingTooDeep { span, .. } => span,
        }
    }
}

fn join_types(types: &[DataType]) -> String {
    types
        .iter()
        .map(DataType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failures that can only be detected while evaluating a built tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// Variable present at construction time but missing from the context
    #[error("variable {name} has no value in the evaluation context")]
    UnboundVariable { name: String },

    /// Context holds a value that does not fit the declared type
    #[error("unexpected value {value} in {context}")]
    UnexpectedValue { value: String, context: String },

    #[error("index {start}..{end} out of range for string of length {length}")]
    IndexOutOfRange { start: i64, end: i64, length: usize },

    #[error("invalid pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {operator}")]
    Overflow { operator: String },
}

/// Result type for expression construction
pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Result type for expression evaluation
pub type EvaluationResult<T> = Result<T, EvaluationError>;
