use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage that produced a diagnostic, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Lexical,
    Syntax,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical"),
            Self::Syntax => write!(f, "syntax"),
        }
    }
}

/// Numeric error code (E100–E299).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Lexical errors (E100–E199) ──
    pub const UNEXPECTED_CHARACTER: Self = Self(100);
    pub const UNTERMINATED_COMMENT: Self = Self(101);
    pub const UNTERMINATED_STRING: Self = Self(102);
    pub const INVALID_NUMBER: Self = Self(103);

    // ── Syntax errors (E200–E299) ──
    pub const UNEXPECTED_TOKEN: Self = Self(200);
    pub const UNEXPECTED_EOF: Self = Self(201);
    pub const INVALID_ITEM: Self = Self(202);
    pub const NESTING_TOO_DEEP: Self = Self(203);

    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Lexical,
            _ => ErrorCategory::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A lexical or syntax error.
///
/// Lexing and parsing stop at the first problem, so a failed stage yields
/// exactly one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WokeError {
    /// Source file name.
    pub file: String,
    pub code: ErrorCode,
    /// Derived from `code`.
    pub category: ErrorCategory,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
    /// The source line the error points into.
    pub source_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl WokeError {
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for WokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.file, self.span, self.code, self.category, self.message
        )
    }
}

impl std::error::Error for WokeError {}
