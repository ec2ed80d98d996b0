//! Core parser infrastructure: token cursor, error reporting, helpers.

use woke_lexer::token::{Token, TokenKind};
use woke_types::ast::Ident;
use woke_types::{ErrorCode, Result, SourceFile, Span, WokeError};

/// Deepest allowed nesting of expressions, blocks, emote wrappers and
/// type annotations combined.
pub const MAX_NESTING_DEPTH: u32 = 64;

/// The WokeLang parser.
///
/// Consumes a token stream produced by the lexer and builds an AST. The
/// first syntax error aborts parsing; no partial tree is returned.
pub struct Parser<'src> {
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Returned by the cursor once `tokens` is exhausted.
    eof: Token,
    /// Source file for error context.
    source_file: &'src SourceFile,
    /// Current nesting depth, see [`MAX_NESTING_DEPTH`].
    depth: u32,
}

impl<'src> Parser<'src> {
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        let eof_span = tokens
            .last()
            .map(|t| t.span)
            .unwrap_or_else(|| Span::point(1, 1));
        Self {
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::Eof, eof_span),
            source_file,
            depth: 0,
        }
    }

    /// Parse the whole token stream into a [`Program`](woke_types::ast::Program).
    pub fn parse(mut self) -> Result<woke_types::ast::Program> {
        let program = self.parse_program()?;
        tracing::debug!(
            file = %self.source_file.name,
            items = program.items.len(),
            "parsed"
        );
        Ok(program)
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Span of the most recently consumed token.
    pub(crate) fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or_else(|| Span::point(1, 1))
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `->` or `→`.
    pub(crate) fn eat_arrow(&mut self) -> bool {
        if self.peek_kind().is_arrow() {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Kind of the token `n` positions ahead of the cursor.
    pub(crate) fn look_ahead(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Consume a token of exactly this kind or fail.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Result<Token> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("'{expected}'")))
        }
    }

    pub(crate) fn expect_arrow(&mut self) -> Result<()> {
        if self.eat_arrow() {
            Ok(())
        } else {
            Err(self.unexpected("'->'"))
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<Ident> {
        match self.peek_kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Ok(Ident::new(name, span))
            }
            _ if self.peek().is_keyword() => {
                let err = self.unexpected("identifier");
                Err(err.with_suggestion(format!(
                    "'{}' is a reserved word, choose a different name",
                    self.peek_kind()
                )))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    pub(crate) fn expect_string_literal(&mut self) -> Result<String> {
        match self.peek_kind() {
            TokenKind::StringLiteral(s) => {
                let s = s.clone();
                self.advance();
                Ok(s)
            }
            _ => Err(self.unexpected("string literal")),
        }
    }

    // ── Nesting ───────────────────────────────────────────────────────────────

    /// Run `parse` one nesting level deeper, failing with E203 instead of
    /// exhausting the native stack.
    pub(crate) fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error_at(
                ErrorCode::NESTING_TOO_DEEP,
                format!("nesting is deeper than the limit of {MAX_NESTING_DEPTH}"),
                self.current_span(),
            )
            .with_suggestion("split the expression or block into smaller functions"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Build an `expected X, got 'Y'` error at the current token.
    pub(crate) fn unexpected(&self, expected: &str) -> WokeError {
        let code = if self.at_end() {
            ErrorCode::UNEXPECTED_EOF
        } else {
            ErrorCode::UNEXPECTED_TOKEN
        };
        self.error_at(
            code,
            format!("expected {expected}, got '{}'", self.peek_kind()),
            self.current_span(),
        )
    }

    pub(crate) fn error_at(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> WokeError {
        WokeError::new(
            &self.source_file.name,
            code,
            message,
            span,
            self.source_file.line_of(span),
        )
    }
}
