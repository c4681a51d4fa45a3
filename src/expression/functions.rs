//! Operator and function builders, grouped by family.
//!
//! Each family registers its builders in a [`FunctionTable`] keyed by the
//! operator token or function name. A builder receives the visitor so it can
//! resolve its operands, checks their types, and returns a typed node.

pub mod arithmetic;
pub mod boolean;
pub mod comparison;
pub mod conditional;
pub mod string;

use crate::expression::{
    BinaryOperator, ExpressionError, ExpressionResult, ExpressionVisitor, ResolvableExpression,
    UnaryOperator,
};
use crate::script::{Expr, Span};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

pub type UnaryBuilder = fn(
    &ExpressionVisitor<'_>,
    UnaryOperator,
    &Expr,
    &Span,
) -> ExpressionResult<ResolvableExpression>;

pub type BinaryBuilder = fn(
    &ExpressionVisitor<'_>,
    BinaryOperator,
    &Expr,
    &Expr,
    &Span,
) -> ExpressionResult<ResolvableExpression>;

pub type CallBuilder =
    fn(&ExpressionVisitor<'_>, &str, &[Expr], &Span) -> ExpressionResult<ResolvableExpression>;

/// Dispatch table from operator tokens and function names to builders
#[derive(Clone, Default)]
pub struct FunctionTable {
    unary: HashMap<UnaryOperator, UnaryBuilder>,
    binary: HashMap<BinaryOperator, BinaryBuilder>,
    calls: HashMap<String, CallBuilder>,
}

impl FunctionTable {
    /// An empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding every built-in operator and function
    pub fn standard() -> Self {
        let mut table = Self::new();
        boolean::register(&mut table);
        comparison::register(&mut table);
        string::register(&mut table);
        arithmetic::register(&mut table);
        table
    }

    /// Shared instance of [`FunctionTable::standard`]
    pub fn standard_ref() -> &'static FunctionTable {
        static STANDARD: OnceLock<FunctionTable> = OnceLock::new();
        STANDARD.get_or_init(FunctionTable::standard)
    }

    pub fn register_unary(&mut self, op: UnaryOperator, builder: UnaryBuilder) {
        self.unary.insert(op, builder);
    }

    pub fn register_binary(&mut self, op: BinaryOperator, builder: BinaryBuilder) {
        self.binary.insert(op, builder);
    }

    /// Register a function called by name; names are matched lowercase
    pub fn register_call(&mut self, name: &str, builder: CallBuilder) {
        self.calls.insert(name.to_lowercase(), builder);
    }

    pub fn unary(&self, op: UnaryOperator) -> Option<UnaryBuilder> {
        self.unary.get(&op).copied()
    }

    pub fn binary(&self, op: BinaryOperator) -> Option<BinaryBuilder> {
        self.binary.get(&op).copied()
    }

    pub fn call(&self, name: &str) -> Option<CallBuilder> {
        self.calls.get(name).copied()
    }

    /// Registered function names, sorted
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.calls.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTable")
            .field("unary", &self.unary.keys().collect::<Vec<_>>())
            .field("binary", &self.binary.keys().collect::<Vec<_>>())
            .field("calls", &self.function_names())
            .finish()
    }
}

/// Check the number of arguments passed to a function
pub(crate) fn check_arity(
    function: &str,
    args: &[Expr],
    min: usize,
    max: usize,
    span: &Span,
) -> ExpressionResult<()> {
    if (min..=max).contains(&args.len()) {
        return Ok(());
    }

    let expected = if min == max {
        min.to_string()
    } else {
        format!("{} to {}", min, max)
    };
    Err(ExpressionError::FunctionArgumentCount {
        function: function.to_string(),
        expected,
        actual: args.len(),
        span: span.clone(),
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let table = FunctionTable::standard();
        assert!(table.unary(UnaryOperator::Not).is_some());
        assert!(table.binary(BinaryOperator::Xor).is_some());
        assert!(table.call("between").is_some());
        assert!(table.call("substr").is_some());
        assert!(table.call("frobnicate").is_none());

        let names = table.function_names();
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
        assert!(names.contains(&"instr"));
    }

    #[test]
    fn test_registration_is_case_insensitive() {
        let mut table = FunctionTable::new();
        table.register_call("UCASE", string::visit_string_call);
        assert!(table.call("ucase").is_some());
    }

    #[test]
    fn test_check_arity() {
        let span = Span::synthetic("f()");
        assert!(check_arity("f", &[], 0, 1, &span).is_ok());

        let err = check_arity("f", &[], 1, 1, &span).unwrap_err();
        assert_eq!(err.to_string(), "function f expects 1 arguments, got 0");

        let err = check_arity("f", &[], 2, 4, &span).unwrap_err();
        assert_eq!(err.to_string(), "function f expects 2 to 4 arguments, got 0");
    }
}
