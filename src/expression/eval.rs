//! Expression evaluation implementation.

use crate::expression::expr::{Function, Node, ResolvableExpression};
use crate::expression::{
    BinaryOperator, Context, EvaluationError, EvaluationResult, UnaryOperator,
};
use crate::types::{DataType, Value};
use regex::Regex;
use std::cmp::Ordering;

/// Evaluator for typed expression trees
pub struct ExpressionEvaluator<'a> {
    /// The variable values to evaluate against
    context: &'a Context,
}

impl<'a> ExpressionEvaluator<'a> {
    /// Create a new evaluator over a context
    pub fn new(context: &'a Context) -> Self {
        Self { context }
    }

    /// Evaluate an expression and return the result
    pub fn evaluate(&self, expr: &ResolvableExpression) -> EvaluationResult<Value> {
        match expr.node() {
            Node::Constant(value) => Ok(value.clone()),

            Node::Variable(name) => {
                let value = self.context.get(name).cloned().ok_or_else(|| {
                    EvaluationError::UnboundVariable { name: name.clone() }
                })?;
                conform(value, expr.data_type(), name)
            }

            Node::Unary { op, operand } => {
                let operand_val = self.evaluate(operand)?;
                evaluate_unary_op(*op, operand_val)
            }

            Node::Binary { op, left, right } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                evaluate_binary_op(*op, left_val, right_val)
            }

            Node::Call(function) => self.evaluate_function(function),
        }
    }

    fn evaluate_optional(
        &self,
        expr: &Option<Box<ResolvableExpression>>,
    ) -> EvaluationResult<Option<Value>> {
        expr.as_ref().map(|e| self.evaluate(e)).transpose()
    }

    /// Evaluate a function with three or more operands
    fn evaluate_function(&self, function: &Function) -> EvaluationResult<Value> {
        match function {
            Function::Between { operand, from, to } => {
                let value = self.evaluate(operand)?;
                let from = self.evaluate(from)?;
                let to = self.evaluate(to)?;
                between(value, from, to)
            }

            Function::Substr {
                operand,
                start,
                end,
            } => {
                let value = self.evaluate(operand)?;
                let start = self.evaluate_optional(start)?;
                let end = self.evaluate_optional(end)?;
                substr(value, start, end)
            }

            Function::Replace {
                operand,
                pattern,
                replacement,
            } => {
                let value = self.evaluate(operand)?;
                let pattern = self.evaluate(pattern)?;
                let replacement = self.evaluate_optional(replacement)?;
                replace(value, pattern, replacement)
            }

            Function::Instr {
                operand,
                pattern,
                start,
                occurrence,
            } => {
                let value = self.evaluate(operand)?;
                let pattern = self.evaluate(pattern)?;
                let start = self.evaluate_optional(start)?;
                let occurrence = self.evaluate_optional(occurrence)?;
                instr(value, pattern, start, occurrence)
            }

            Function::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let branch = match self.evaluate(condition)? {
                    Value::Boolean(true) => self.evaluate(then_branch)?,
                    // NULL conditions take the else branch
                    Value::Boolean(false) | Value::Null => self.evaluate(else_branch)?,
                    other => return Err(unexpected(&other, "if condition")),
                };
                // An Integer branch of a Number conditional is widened
                match then_branch.data_type().widen(else_branch.data_type()) {
                    Some(data_type) => conform(branch, data_type, "if"),
                    None => Ok(branch),
                }
            }
        }
    }
}

impl ResolvableExpression {
    /// Evaluate this tree against a context.
    ///
    /// Neither the tree nor the context is modified, so repeated calls with
    /// equal contexts yield equal results.
    pub fn resolve(&self, context: &Context) -> EvaluationResult<Value> {
        ExpressionEvaluator::new(context).evaluate(self)
    }
}

/// Helper function to evaluate an expression against a context
pub fn evaluate_expression(
    expr: &ResolvableExpression,
    context: &Context,
) -> EvaluationResult<Value> {
    ExpressionEvaluator::new(context).evaluate(expr)
}

/// Bring a value to the declared type of the node producing it
fn conform(value: Value, data_type: DataType, context: &str) -> EvaluationResult<Value> {
    let shown = value.to_string();
    value
        .conform_to(data_type)
        .ok_or_else(|| EvaluationError::UnexpectedValue {
            value: shown,
            context: format!("{} of type {}", context, data_type),
        })
}

fn unexpected(value: &Value, context: &str) -> EvaluationError {
    EvaluationError::UnexpectedValue {
        value: value.to_string(),
        context: context.to_string(),
    }
}

/// Evaluate a binary operation
fn evaluate_binary_op(op: BinaryOperator, left: Value, right: Value) -> EvaluationResult<Value> {
    // Handle NULL propagation for most operators
    if left.is_null() || right.is_null() {
        return Ok(match op {
            // NULL AND false = false, NULL AND true = NULL
            BinaryOperator::And
                if matches!(left, Value::Boolean(false)) || matches!(right, Value::Boolean(false)) =>
            {
                Value::Boolean(false)
            }
            // NULL OR true = true, NULL OR false = NULL
            BinaryOperator::Or
                if matches!(left, Value::Boolean(true)) || matches!(right, Value::Boolean(true)) =>
            {
                Value::Boolean(true)
            }
            _ => Value::Null,
        });
    }

    match op {
        // Arithmetic operators
        BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div => {
            arithmetic(op, &left, &right)
        }

        // Comparison operators
        BinaryOperator::Eq => compare_values(&left, &right, op, |ord| ord == Ordering::Equal),
        BinaryOperator::Ne => compare_values(&left, &right, op, |ord| ord != Ordering::Equal),
        BinaryOperator::Lt => compare_values(&left, &right, op, |ord| ord == Ordering::Less),
        BinaryOperator::Le => compare_values(&left, &right, op, |ord| ord != Ordering::Greater),
        BinaryOperator::Gt => compare_values(&left, &right, op, |ord| ord == Ordering::Greater),
        BinaryOperator::Ge => compare_values(&left, &right, op, |ord| ord != Ordering::Less),

        // Logical operators
        BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Xor => {
            match (&left, &right) {
                (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(match op {
                    BinaryOperator::And => *a && *b,
                    BinaryOperator::Or => *a || *b,
                    _ => *a ^ *b,
                })),
                (Value::Boolean(_), other) | (other, _) => Err(unexpected(other, op.as_str())),
            }
        }

        // String operators
        BinaryOperator::Concat => match (&left, &right) {
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            (Value::String(_), other) | (other, _) => Err(unexpected(other, op.as_str())),
        },

        BinaryOperator::Match => match (&left, &right) {
            (Value::String(value), Value::String(pattern)) => {
                // Anchored so that only a full match counts
                let regex = compile(&format!("^(?:{})$", pattern), pattern)?;
                Ok(Value::Boolean(regex.is_match(value)))
            }
            (Value::String(_), other) | (other, _) => Err(unexpected(other, op.as_str())),
        },
    }
}

fn arithmetic(op: BinaryOperator, left: &Value, right: &Value) -> EvaluationResult<Value> {
    if let (Value::Integer(a), Value::Integer(b)) = (left, right) {
        let result = match op {
            BinaryOperator::Add => Some(a.checked_add(*b)),
            BinaryOperator::Sub => Some(a.checked_sub(*b)),
            BinaryOperator::Mul => Some(a.checked_mul(*b)),
            _ => None,
        };
        if let Some(result) = result {
            return result.map(Value::Integer).ok_or_else(|| EvaluationError::Overflow {
                operator: op.as_str().to_string(),
            });
        }
    }

    let a = left.as_f64().ok_or_else(|| unexpected(left, op.as_str()))?;
    let b = right.as_f64().ok_or_else(|| unexpected(right, op.as_str()))?;

    Ok(Value::Number(match op {
        BinaryOperator::Add => a + b,
        BinaryOperator::Sub => a - b,
        BinaryOperator::Mul => a * b,
        _ => {
            if b == 0.0 {
                return Err(EvaluationError::DivisionByZero);
            }
            a / b
        }
    }))
}

/// Compare two values and apply a comparison function
fn compare_values<F>(
    left: &Value,
    right: &Value,
    op: BinaryOperator,
    cmp_fn: F,
) -> EvaluationResult<Value>
where
    F: FnOnce(Ordering) -> bool,
{
    match left.compare(right) {
        Some(ordering) => Ok(Value::Boolean(cmp_fn(ordering))),
        // NaN is unordered: only <> holds
        None if left.as_f64().is_some() && right.as_f64().is_some() => {
            Ok(Value::Boolean(op == BinaryOperator::Ne))
        }
        None => Err(unexpected(right, op.as_str())),
    }
}

/// Evaluate a unary operation
fn evaluate_unary_op(op: UnaryOperator, operand: Value) -> EvaluationResult<Value> {
    if op == UnaryOperator::IsNull {
        return Ok(Value::Boolean(operand.is_null()));
    }

    match (op, operand) {
        (_, Value::Null) => Ok(Value::Null),

        (UnaryOperator::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),

        (UnaryOperator::Plus, value @ (Value::Integer(_) | Value::Number(_))) => Ok(value),
        (UnaryOperator::Minus, Value::Integer(n)) => n
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| EvaluationError::Overflow {
                operator: op.as_str().to_string(),
            }),
        (UnaryOperator::Minus, Value::Number(n)) => Ok(Value::Number(-n)),

        // trim strips every control character and space, the one-sided
        // variants only ASCII whitespace
        (UnaryOperator::Trim, Value::String(s)) => {
            Ok(Value::String(s.trim_matches(|c: char| c <= ' ').to_string()))
        }
        (UnaryOperator::Ltrim, Value::String(s)) => Ok(Value::String(
            s.trim_start_matches(|c: char| c.is_ascii_whitespace())
                .to_string(),
        )),
        (UnaryOperator::Rtrim, Value::String(s)) => Ok(Value::String(
            s.trim_end_matches(|c: char| c.is_ascii_whitespace())
                .to_string(),
        )),
        (UnaryOperator::Upper, Value::String(s)) => Ok(Value::String(s.to_uppercase())),
        (UnaryOperator::Lower, Value::String(s)) => Ok(Value::String(s.to_lowercase())),
        (UnaryOperator::Length, Value::String(s)) => Ok(Value::Integer(s.chars().count() as i64)),

        (op, other) => Err(unexpected(&other, op.as_str())),
    }
}

fn compile(regex: &str, pattern: &str) -> EvaluationResult<Regex> {
    Regex::new(regex).map_err(|e| EvaluationError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

fn between(value: Value, from: Value, to: Value) -> EvaluationResult<Value> {
    if value.is_null() || from.is_null() || to.is_null() {
        return Ok(Value::Null);
    }

    let lower = value
        .compare(&from)
        .map(|ord| ord != Ordering::Less);
    let upper = value
        .compare(&to)
        .map(|ord| ord != Ordering::Greater);

    match (lower, upper) {
        (Some(lower), Some(upper)) => Ok(Value::Boolean(lower && upper)),
        // NaN bounds or operand never satisfy the range
        _ if [&value, &from, &to].iter().all(|v| v.as_f64().is_some()) => {
            Ok(Value::Boolean(false))
        }
        _ => Err(unexpected(&value, "between")),
    }
}

fn string_arg(value: Value, context: &str) -> EvaluationResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(unexpected(&other, context)),
    }
}

/// Optional integer argument; `Some(None)` when it evaluated to NULL
fn integer_arg(value: Option<Value>, context: &str) -> EvaluationResult<Option<Option<i64>>> {
    match value {
        None => Ok(Some(None)),
        Some(Value::Null) => Ok(None),
        Some(Value::Integer(i)) => Ok(Some(Some(i))),
        Some(other) => Err(unexpected(&other, context)),
    }
}

fn substr(value: Value, start: Option<Value>, end: Option<Value>) -> EvaluationResult<Value> {
    let Some(value) = string_arg(value, "substr")? else {
        return Ok(Value::Null);
    };
    let (Some(start), Some(end)) = (integer_arg(start, "substr")?, integer_arg(end, "substr")?)
    else {
        return Ok(Value::Null);
    };

    let chars: Vec<char> = value.chars().collect();
    let length = chars.len();
    let start = start.unwrap_or(0);
    let end = end.unwrap_or(length as i64);

    if start < 0 || start > end || end > length as i64 {
        return Err(EvaluationError::IndexOutOfRange { start, end, length });
    }

    Ok(Value::String(
        chars[start as usize..end as usize].iter().collect(),
    ))
}

fn replace(value: Value, pattern: Value, replacement: Option<Value>) -> EvaluationResult<Value> {
    let replacement = match replacement {
        Some(replacement) => string_arg(replacement, "replace")?,
        None => Some(String::new()),
    };
    let (Some(value), Some(pattern), Some(replacement)) = (
        string_arg(value, "replace")?,
        string_arg(pattern, "replace")?,
        replacement,
    ) else {
        return Ok(Value::Null);
    };

    let regex = compile(&pattern, &pattern)?;
    let replacement = group_references(&replacement, regex.captures_len() - 1);
    Ok(Value::String(
        regex.replace_all(&value, replacement.as_str()).into_owned(),
    ))
}

/// Rewrite a replacement string into `regex` expansion syntax.
///
/// `$N` takes as many digits as still name an existing group and becomes
/// `${N}`, so `$1x` is group 1 followed by `x`. A backslash makes the next
/// character literal. Any other `$` is kept as a literal dollar.
fn group_references(replacement: &str, groups: usize) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('$') => out.push_str("$$"),
                Some(next) => out.push(next),
                None => out.push('\\'),
            },
            '$' => match chars.peek().and_then(|d| d.to_digit(10)) {
                Some(first) => {
                    chars.next();
                    let mut group = first as usize;
                    while let Some(digit) = chars.peek().and_then(|d| d.to_digit(10)) {
                        let next = group * 10 + digit as usize;
                        if next > groups {
                            break;
                        }
                        group = next;
                        chars.next();
                    }
                    out.push_str(&format!("${{{}}}", group));
                }
                None if chars.peek() == Some(&'{') => out.push('$'),
                None => out.push_str("$$"),
            },
            other => out.push(other),
        }
    }
    out
}

fn instr(
    value: Value,
    pattern: Value,
    start: Option<Value>,
    occurrence: Option<Value>,
) -> EvaluationResult<Value> {
    let (Some(value), Some(pattern)) = (string_arg(value, "instr")?, string_arg(pattern, "instr")?)
    else {
        return Ok(Value::Null);
    };
    let (Some(start), Some(occurrence)) = (
        integer_arg(start, "instr")?,
        integer_arg(occurrence, "instr")?,
    ) else {
        return Ok(Value::Null);
    };

    let chars: Vec<char> = value.chars().collect();
    let needle: Vec<char> = pattern.chars().collect();
    let start = start.unwrap_or(0);
    let occurrence = occurrence.unwrap_or(1);

    if start < 0 || start > chars.len() as i64 {
        return Err(EvaluationError::IndexOutOfRange {
            start,
            end: chars.len() as i64,
            length: chars.len(),
        });
    }

    // Positions count from the search start; not found is -1, which
    // becomes 0 once shifted to 1-based
    let position = match ordinal_index_of(&chars[start as usize..], &needle, occurrence) {
        Some(index) => index as i64,
        None => -1,
    };
    Ok(Value::Integer(position + 1))
}

/// Index of the n-th (1-based) possibly overlapping occurrence of `needle`
fn ordinal_index_of(haystack: &[char], needle: &[char], occurrence: i64) -> Option<usize> {
    if occurrence <= 0 {
        return None;
    }
    if needle.is_empty() {
        return Some(0);
    }

    let mut found = 0;
    for index in 0..haystack.len() {
        if haystack[index..].starts_with(needle) {
            found += 1;
            if found == occurrence {
                return Some(index);
            }
        }
    }
    None
}
