//! Statement parsing.
//!
//! Simple statements end with `;`. Compound statements (`when`, `repeat`,
//! `only if okay`) end with their closing brace, except `attempt safely`,
//! whose `or reassure "..."` tail is followed by `;`.

use woke_lexer::token::TokenKind;
use woke_types::ast::*;
use woke_types::Result;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// `"{" { Stmt } "}"`
    pub(crate) fn parse_block(&mut self) -> Result<Block> {
        self.nested(Self::parse_block_inner)
    }

    fn parse_block_inner(&mut self) -> Result<Block> {
        let start = self.expect(&TokenKind::LBrace)?.span;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Block {
            stmts,
            span: start.merge(self.previous_span()),
        })
    }

    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt> {
        let start = self.current_span();
        let kind = match self.peek_kind() {
            TokenKind::Remember => self.parse_remember()?,
            TokenKind::Identifier(_) if self.look_ahead(1) == &TokenKind::Eq => {
                let name = self.expect_identifier()?;
                self.expect(&TokenKind::Eq)?;
                let value = self.parse_expression()?;
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::Assign { name, value }
            }
            TokenKind::Give => {
                self.advance();
                self.expect(&TokenKind::Back)?;
                let value = self.parse_expression()?;
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::GiveBack(value)
            }
            TokenKind::When => self.parse_when()?,
            TokenKind::Repeat => {
                self.advance();
                let count = self.parse_expression()?;
                self.expect(&TokenKind::Times)?;
                let body = self.parse_block()?;
                StmtKind::Repeat { count, body }
            }
            TokenKind::Attempt => {
                self.advance();
                self.expect(&TokenKind::Safely)?;
                let body = self.parse_block()?;
                self.expect(&TokenKind::Or)?;
                self.expect(&TokenKind::Reassure)?;
                let reassurance = self.expect_string_literal()?;
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::Attempt { body, reassurance }
            }
            TokenKind::Only => {
                self.advance();
                self.expect(&TokenKind::If)?;
                self.expect(&TokenKind::Okay)?;
                let permission = self.expect_string_literal()?;
                let body = self.parse_block()?;
                StmtKind::Consent { permission, body }
            }
            TokenKind::Complain => {
                self.advance();
                let message = self.expect_string_literal()?;
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::Complain(message)
            }
            TokenKind::Spawn => {
                self.advance();
                self.expect(&TokenKind::Worker)?;
                let name = self.expect_identifier()?;
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::Spawn(name)
            }
            TokenKind::Say => {
                let keyword = self.advance().span;
                let value = self.parse_expression()?;
                self.expect(&TokenKind::Semicolon)?;
                let span = keyword.merge(value.span);
                StmtKind::Expr(Expr::new(
                    ExprKind::Call {
                        name: Ident::new("say", keyword),
                        args: vec![value],
                    },
                    span,
                ))
            }
            TokenKind::At => {
                let tag = self.parse_emote_tag()?;
                let stmt = self.nested(Self::parse_stmt)?;
                StmtKind::Emote {
                    tag,
                    stmt: Box::new(stmt),
                }
            }
            _ => {
                let expr = self.parse_expression()?;
                self.expect(&TokenKind::Semicolon)?;
                StmtKind::Expr(expr)
            }
        };
        Ok(Stmt::new(kind, start.merge(self.previous_span())))
    }

    /// `"remember" Ident "=" Expr [ "measured" "in" Ident ] ";"`
    ///
    /// The unit suffix binds to the preceding primary, so by the time the
    /// initializer is parsed it has already absorbed a trailing
    /// `measured in`. A unit on the whole initializer moves onto the
    /// declaration.
    fn parse_remember(&mut self) -> Result<StmtKind> {
        self.expect(&TokenKind::Remember)?;
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expression()?;
        self.expect(&TokenKind::Semicolon)?;

        let (value, unit) = match value.kind {
            ExprKind::Measured { value, unit } => (*value, Some(unit)),
            kind => (Expr::new(kind, value.span), None),
        };
        Ok(StmtKind::Remember { name, value, unit })
    }

    /// `"when" Expr Block [ "otherwise" Block ]`
    fn parse_when(&mut self) -> Result<StmtKind> {
        self.expect(&TokenKind::When)?;
        let condition = self.parse_expression()?;
        let then_block = self.parse_block()?;
        let otherwise_block = if self.eat(&TokenKind::Otherwise) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(StmtKind::When {
            condition,
            then_block,
            otherwise_block,
        })
    }
}
