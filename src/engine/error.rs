//! Errors surfaced by the script engine.

use crate::expression::{EvaluationError, ExpressionError};
use crate::script::ParseError;
use thiserror::Error;

/// Any failure while running a script, with the underlying message kept
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Semantic(#[from] ExpressionError),

    #[error(transparent)]
    Runtime(#[from] EvaluationError),
}

pub type ScriptResult<T> = Result<T, ScriptError>;
