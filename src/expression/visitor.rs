//! Dispatcher turning syntax nodes into typed expression trees.

use crate::config::EngineConfig;
use crate::expression::functions::{conditional, FunctionTable};
use crate::expression::{
    ExpressionError, ExpressionResult, ResolvableExpression, SymbolTable,
};
use crate::script::{Expr, ExprKind, Literal};
use crate::types::Value;
use std::cell::Cell;

/// Builds typed expressions from syntax nodes.
///
/// Literals, variables and parentheses are handled here; operators and
/// functions are looked up in a [`FunctionTable`] whose builders call back
/// into [`ExpressionVisitor::visit`] to resolve their operands.
pub struct ExpressionVisitor<'a> {
    symbols: &'a SymbolTable,
    functions: &'a FunctionTable,
    max_depth: usize,
    depth: Cell<usize>,
}

impl<'a> ExpressionVisitor<'a> {
    pub fn new(symbols: &'a SymbolTable, functions: &'a FunctionTable) -> Self {
        Self::with_config(symbols, functions, &EngineConfig::default())
    }

    pub fn with_config(
        symbols: &'a SymbolTable,
        functions: &'a FunctionTable,
        config: &EngineConfig,
    ) -> Self {
        Self {
            symbols,
            functions,
            max_depth: config.max_depth,
            depth: Cell::new(0),
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        self.symbols
    }

    /// Resolve a syntax node into a typed expression
    pub fn visit(&self, expr: &Expr) -> ExpressionResult<ResolvableExpression> {
        let depth = self.depth.get();
        if depth >= self.max_depth {
            return Err(ExpressionError::NestingTooDeep {
                limit: self.max_depth,
                span: expr.span.clone(),
            });
        }

        self.depth.set(depth + 1);
        let resolved = self.dispatch(expr);
        self.depth.set(depth);
        resolved
    }

    /// Resolve an optional argument; `_` counts as absent
    pub fn visit_optional(
        &self,
        expr: Option<&Expr>,
    ) -> ExpressionResult<Option<ResolvableExpression>> {
        match expr {
            Some(expr) if !expr.is_omitted() => self.visit(expr).map(Some),
            _ => Ok(None),
        }
    }

    fn dispatch(&self, expr: &Expr) -> ExpressionResult<ResolvableExpression> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(ResolvableExpression::constant(literal_value(literal))),

            ExprKind::Variable(name) => match self.symbols.get(name) {
                Some(data_type) => Ok(ResolvableExpression::variable(name.clone(), data_type)),
                None => Err(ExpressionError::UndefinedVariable {
                    name: name.clone(),
                    span: expr.span.clone(),
                }),
            },

            ExprKind::Parenthesized(inner) => self.visit(inner),

            ExprKind::Unary { op, operand } => {
                let builder = self.functions.unary(*op).ok_or_else(|| {
                    ExpressionError::UnknownFunction {
                        name: op.as_str().to_string(),
                        span: expr.span.clone(),
                    }
                })?;
                builder(self, *op, operand, &expr.span)
            }

            ExprKind::Binary { op, left, right } => {
                let builder = self.functions.binary(*op).ok_or_else(|| {
                    ExpressionError::UnknownFunction {
                        name: op.as_str().to_string(),
                        span: expr.span.clone(),
                    }
                })?;
                builder(self, *op, left, right, &expr.span)
            }

            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => conditional::visit_if(self, condition, then_branch, else_branch, &expr.span),

            ExprKind::Call { name, args } => {
                let name = name.to_lowercase();
                let builder = self.functions.call(&name).ok_or_else(|| {
                    ExpressionError::UnknownFunction {
                        name: name.clone(),
                        span: expr.span.clone(),
                    }
                })?;
                builder(self, &name, args, &expr.span)
            }

            ExprKind::Omitted => Err(ExpressionError::MissingOperand {
                span: expr.span.clone(),
            }),
        }
    }
}

/// Convert a literal to its canonical runtime value
fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Null => Value::Null,
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Integer(i) => Value::Integer(*i),
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::String(s.clone()),
    }
}
