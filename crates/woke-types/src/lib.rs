//! Shared types for the WokeLang pipeline.
//!
//! This crate defines the AST node types, source spans, and the
//! diagnostics produced by the lexer and parser. The evaluator has its own
//! runtime error type; front-end and runtime failures are never mixed.

mod error;
mod span;
pub mod ast;

pub use error::{ErrorCategory, ErrorCode, WokeError};
pub use span::{SourceFile, Span};

/// Result type used by the lexer and parser.
pub type Result<T> = std::result::Result<T, WokeError>;
