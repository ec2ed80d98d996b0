//! Core WokeLang lexer: source text to token stream.
//!
//! - Whitespace (including newlines) separates tokens and is dropped
//! - `//` line comments and `/* ... */` block comments (non-nesting)
//! - Integer and float literals, raw string literals
//! - `->` lexes to [`TokenKind::Arrow`] and `→` to [`TokenKind::UnicodeArrow`]
//! - Stops at the first error; there is no recovery

use woke_types::{ErrorCode, Result, SourceFile, Span, WokeError};

use crate::token::{Token, TokenKind};

/// The WokeLang lexer.
///
/// Walks the source by `char`, so columns in spans count characters.
pub struct Lexer<'src> {
    source: &'src str,
    /// Source file for error reporting.
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: &source_file.source,
            source_file,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Lex the whole file. The returned stream always ends with
    /// [`TokenKind::Eof`].
    pub fn lex(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tracing::debug!(
            file = %self.source_file.name,
            lines = self.source_file.line_count(),
            tokens = tokens.len(),
            "lexed"
        );
        Ok(tokens)
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn error(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> WokeError {
        WokeError::new(
            &self.source_file.name,
            code,
            message,
            span,
            self.source_file.line_of(span),
        )
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip whitespace and comments until the next significant character.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(' ' | '\t' | '\r' | '\n'), _) => {
                    self.advance();
                }
                (Some('/'), Some('/')) => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                (Some('/'), Some('*')) => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    /// Consume `/* ... */`. The first `*/` closes the comment.
    fn skip_block_comment(&mut self) -> Result<()> {
        let (start_line, start_col) = (self.line, self.col);
        self.advance();
        self.advance();
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return Ok(());
                }
                Some(_) => {}
                None => {
                    return Err(self
                        .error(
                            ErrorCode::UNTERMINATED_COMMENT,
                            "unterminated block comment",
                            Span::point(start_line, start_col),
                        )
                        .with_suggestion("close the comment with */"));
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Token scanning
    // ─────────────────────────────────────────────────────────────

    fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;

        let start_line = self.line;
        let start_col = self.col;
        let Some(ch) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, self.current_span()));
        };

        let kind = match ch {
            '"' => return self.scan_string(start_line, start_col),
            '0'..='9' => return self.scan_number(start_line, start_col),
            'a'..='z' | 'A'..='Z' | '_' => return Ok(self.scan_identifier(start_line, start_col)),

            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '→' => TokenKind::UnicodeArrow,
            '-' => self.pick('>', TokenKind::Arrow, TokenKind::Minus),
            '=' => self.pick('=', TokenKind::EqEq, TokenKind::Eq),
            '<' => self.pick('=', TokenKind::LessEq, TokenKind::Less),
            '>' => self.pick('=', TokenKind::GreaterEq, TokenKind::Greater),
            '!' if self.peek() == Some('=') => {
                self.advance();
                TokenKind::BangEq
            }

            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '@' => TokenKind::At,

            other => {
                let err = self.error(
                    ErrorCode::UNEXPECTED_CHARACTER,
                    format!("unexpected character '{other}'"),
                    self.span_from(start_line, start_col),
                );
                return Err(if other == '!' {
                    err.with_suggestion("use 'not' for negation or '!=' for inequality")
                } else {
                    err
                });
            }
        };

        Ok(Token::new(kind, self.span_from(start_line, start_col)))
    }

    /// Two-character operator helper: consume `next` and return `double`
    /// if it follows, otherwise return `single`.
    fn pick(&mut self, next: char, double: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some(next) {
            self.advance();
            double
        } else {
            single
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Number literals
    // ─────────────────────────────────────────────────────────────

    fn scan_number(&mut self, start_line: u32, start_col: u32) -> Result<Token> {
        let start = self.pos - 1;
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }

        let is_float = self.peek() == Some('.') && matches!(self.peek_at(1), Some('0'..='9'));
        if is_float {
            self.advance();
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }

        let text = &self.source[start..self.pos];
        let span = self.span_from(start_line, start_col);
        let kind = if is_float {
            TokenKind::float(text)
        } else {
            text.parse().map(TokenKind::IntLiteral).ok()
        };

        kind.map(|kind| Token::new(kind, span)).ok_or_else(|| {
            self.error(
                ErrorCode::INVALID_NUMBER,
                format!("number literal '{text}' is out of range"),
                span,
            )
        })
    }

    // ─────────────────────────────────────────────────────────────
    // Identifiers & keywords
    // ─────────────────────────────────────────────────────────────

    fn scan_identifier(&mut self, start_line: u32, start_col: u32) -> Token {
        let start = self.pos - 1;
        while matches!(self.peek(), Some('a'..='z' | 'A'..='Z' | '0'..='9' | '_')) {
            self.advance();
        }

        let text = &self.source[start..self.pos];
        let kind = TokenKind::from_keyword(text)
            .unwrap_or_else(|| TokenKind::Identifier(text.to_string()));
        Token::new(kind, self.span_from(start_line, start_col))
    }

    // ─────────────────────────────────────────────────────────────
    // String literals
    // ─────────────────────────────────────────────────────────────

    /// Scan the rest of a string after its opening quote. A backslash keeps
    /// itself and the following character verbatim.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Result<Token> {
        let start = self.pos;
        loop {
            let consumed = match self.advance() {
                Some('"') => break,
                Some('\\') => self.advance(),
                other => other,
            };
            if consumed.is_none() {
                return Err(self.error(
                    ErrorCode::UNTERMINATED_STRING,
                    "unterminated string literal",
                    Span::point(start_line, start_col),
                ));
            }
        }

        // pos sits just past the closing quote
        let contents = &self.source[start..self.pos - 1];
        Ok(Token::new(
            TokenKind::StringLiteral(contents.to_string()),
            self.span_from(start_line, start_col),
        ))
    }
}

/// Lex a source file in one call.
pub fn lex(source_file: &SourceFile) -> Result<Vec<Token>> {
    Lexer::new(source_file).lex()
}
