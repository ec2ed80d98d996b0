//! WokeLang parser: converts a token stream into an AST.

mod parse_decl;
mod parse_expr;
mod parse_stmt;
mod parse_type;
mod parser;

pub use parser::{Parser, MAX_NESTING_DEPTH};

use woke_types::ast::Program;
use woke_types::{Result, SourceFile};

/// Lex and parse a source file.
///
/// Fails with the first lexical or syntax error; the error's category says
/// which stage rejected the input.
pub fn parse(source_file: &SourceFile) -> Result<Program> {
    let tokens = woke_lexer::lex(source_file)?;
    Parser::new(tokens, source_file).parse()
}
