//! Runtime error types for the evaluator.

use serde::Serialize;
use thiserror::Error;

/// A runtime failure. Only an enclosing `attempt safely` block can recover
/// from one; otherwise it ends the program.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvalError {
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },

    #[error("undefined function: {name}")]
    UndefinedFunction { name: String },

    #[error("{name}() expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    /// Both operands carried units, but different ones.
    #[error("unit mismatch: cannot combine '{left}' with '{right}'")]
    UnitMismatch { left: String, right: String },

    /// Raised by `complain "..."`.
    #[error("complaint: {message}")]
    Complaint { message: String },

    /// The consent policy refused an `only if okay` permission.
    #[error("consent denied for '{permission}'")]
    ConsentDenied { permission: String },

    #[error("call depth exceeded the limit of {limit}")]
    StackOverflow { limit: usize },
}

impl EvalError {
    pub(crate) fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            message: message.into(),
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
