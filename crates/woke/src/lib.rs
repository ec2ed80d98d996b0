//! WokeLang driver: orchestrates the full pipeline.
//!
//! ```text
//! WokeLang Source → Lexer → Parser → Evaluator → value + printed lines
//! ```
//!
//! Each stage keeps its own error type; [`Error`] records which stage failed.

use serde::Serialize;
use thiserror::Error;
use woke_lexer::Token;
use woke_types::ast::Program;

pub use woke_eval::{EvalConfig, EvalError, Value};
pub use woke_types::{SourceFile, WokeError};

/// How `only if okay` permissions are answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Consent {
    /// Grant every permission.
    #[default]
    Grant,
    /// Refuse every permission.
    Deny,
    /// Ask on stderr and read the answer from stdin.
    Ask,
}

/// How a program should be run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: EvalConfig,
    pub consent: Consent,
}

/// A successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// What `main` gave back (`Unit` without a `main`).
    pub value: Value,
    /// Every printed line, in order.
    pub output: Vec<String>,
}

/// The first failure of the pipeline, tagged with its stage.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "stage", content = "error", rename_all = "lowercase")]
pub enum Error {
    #[error(transparent)]
    Lex(WokeError),
    #[error(transparent)]
    Parse(WokeError),
    #[error(transparent)]
    Runtime(EvalError),
}

/// Lex a source file.
pub fn tokens(source_file: &SourceFile) -> Result<Vec<Token>, Error> {
    woke_lexer::lex(source_file).map_err(Error::Lex)
}

/// Lex and parse a source file.
pub fn parse(source_file: &SourceFile) -> Result<Program, Error> {
    let tokens = tokens(source_file)?;
    woke_parser::Parser::new(tokens, source_file)
        .parse()
        .map_err(Error::Parse)
}

/// Run `source` through the whole pipeline.
///
/// `name` is only used in diagnostics.
pub fn run_source(name: &str, source: &str, options: &RunOptions) -> Result<Outcome, Error> {
    let source_file = SourceFile::new(name, source);
    let program = parse(&source_file)?;

    let evaluator = woke_eval::Evaluator::with_config(options.config.clone());
    let mut evaluator = match options.consent {
        Consent::Grant => evaluator,
        Consent::Deny => evaluator.with_consent_policy(woke_eval::DenyAll),
        Consent::Ask => evaluator.with_consent_policy(woke_eval::Prompt::stdio()),
    };

    match evaluator.run(&program) {
        Ok(value) => Ok(Outcome {
            value,
            output: evaluator.output().to_vec(),
        }),
        Err(err) => {
            tracing::debug!(file = name, error = %err, "runtime error");
            Err(Error::Runtime(err))
        }
    }
}
