//! Top-level and declaration parsing.
//!
//! Handles functions (with their optional emote tag, `hello` and `goodbye`
//! messages), gratitude blocks, worker and side-quest declarations, and
//! constants.

use woke_lexer::token::TokenKind;
use woke_types::ast::*;
use woke_types::{ErrorCode, Result};

use crate::parser::Parser;

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Program
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse a complete program: `{ Item } EOF`.
    pub(crate) fn parse_program(&mut self) -> Result<Program> {
        let start = self.current_span();
        let mut items = Vec::new();
        while !self.at_end() {
            items.push(self.parse_item()?);
        }
        let span = start.merge(self.previous_span());
        Ok(Program { items, span })
    }

    fn parse_item(&mut self) -> Result<Item> {
        match self.peek_kind() {
            TokenKind::At | TokenKind::To => Ok(Item::Function(self.parse_function_decl()?)),
            TokenKind::Thanks => Ok(Item::Gratitude(self.parse_gratitude_block()?)),
            TokenKind::Worker | TokenKind::Side => Ok(Item::Worker(self.parse_worker_decl()?)),
            TokenKind::Const => Ok(Item::Const(self.parse_const_decl()?)),
            other => Err(self
                .error_at(
                    ErrorCode::INVALID_ITEM,
                    format!("expected a top-level declaration, got '{other}'"),
                    self.current_span(),
                )
                .with_suggestion(
                    "top level accepts 'to', 'thanks to', 'worker', 'side quest' and 'const'",
                )),
        }
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Functions
    // ══════════════════════════════════════════════════════════════════════════

    /// ```ebnf
    /// FunctionDecl = [ EmoteTag ] "to" Ident "(" [ Param { "," Param } ] ")"
    ///                [ Arrow Type ]
    ///                "{" [ "hello" String ";" ] { Stmt } [ "goodbye" String ";" ] "}" ;
    /// ```
    fn parse_function_decl(&mut self) -> Result<FunctionDecl> {
        let start = self.current_span();
        let emote = if self.check(&TokenKind::At) {
            Some(self.parse_emote_tag()?)
        } else {
            None
        };

        self.expect(&TokenKind::To)?;
        let name = self.expect_identifier()?;
        let params = self.parse_params()?;
        let return_type = if self.eat_arrow() {
            Some(self.parse_type_annotation()?)
        } else {
            None
        };

        let body_start = self.expect(&TokenKind::LBrace)?.span;
        let hello = self.parse_lifecycle_message(&TokenKind::Hello)?;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::Goodbye) && !self.check(&TokenKind::RBrace) && !self.at_end() {
            stmts.push(self.parse_stmt()?);
        }

        let goodbye = self.parse_lifecycle_message(&TokenKind::Goodbye)?;
        self.expect(&TokenKind::RBrace)?;
        let body = Block {
            stmts,
            span: body_start.merge(self.previous_span()),
        };

        Ok(FunctionDecl {
            emote,
            name,
            params,
            return_type,
            hello,
            body,
            goodbye,
            span: start.merge(self.previous_span()),
        })
    }

    /// `hello "msg";` / `goodbye "msg";` when the current token is `keyword`.
    fn parse_lifecycle_message(&mut self, keyword: &TokenKind) -> Result<Option<String>> {
        if !self.eat(keyword) {
            return Ok(None);
        }
        let message = self.expect_string_literal()?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(Some(message))
    }

    /// `"(" [ Param { "," Param } ] ")"`
    fn parse_params(&mut self) -> Result<Vec<Param>> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let name = self.expect_identifier()?;
                let type_ann = if self.eat(&TokenKind::Colon) {
                    Some(self.parse_type_annotation()?)
                } else {
                    None
                };
                let span = type_ann
                    .as_ref()
                    .map_or(name.span, |t| name.span.merge(t.span));
                params.push(Param {
                    name,
                    type_ann,
                    span,
                });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Emote Tags
    // ══════════════════════════════════════════════════════════════════════════

    /// `"@" Ident [ "(" [ Ident "=" Expr { "," Ident "=" Expr } ] ")" ]`
    pub(crate) fn parse_emote_tag(&mut self) -> Result<EmoteTag> {
        let start = self.expect(&TokenKind::At)?.span;
        let name = self.expect_identifier()?;
        let mut params = Vec::new();
        if self.eat(&TokenKind::LParen) {
            if !self.check(&TokenKind::RParen) {
                loop {
                    let key = self.expect_identifier()?;
                    self.expect(&TokenKind::Eq)?;
                    let value = self.parse_expression()?;
                    params.push(EmoteParam { name: key, value });
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(&TokenKind::RParen)?;
        }
        Ok(EmoteTag {
            name,
            params,
            span: start.merge(self.previous_span()),
        })
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Gratitude, Workers, Constants
    // ══════════════════════════════════════════════════════════════════════════

    /// `"thanks" "to" "{" { String Arrow String ";" } "}"`
    fn parse_gratitude_block(&mut self) -> Result<GratitudeBlock> {
        let start = self.expect(&TokenKind::Thanks)?.span;
        self.expect(&TokenKind::To)?;
        self.expect(&TokenKind::LBrace)?;

        let mut entries = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let entry_start = self.current_span();
            let contributor = self.expect_string_literal()?;
            self.expect_arrow()?;
            let contribution = self.expect_string_literal()?;
            self.expect(&TokenKind::Semicolon)?;
            entries.push(GratitudeEntry {
                contributor,
                contribution,
                span: entry_start.merge(self.previous_span()),
            });
        }
        self.expect(&TokenKind::RBrace)?;

        Ok(GratitudeBlock {
            entries,
            span: start.merge(self.previous_span()),
        })
    }

    /// `"worker" Ident Block` or `"side" "quest" Ident Block`
    fn parse_worker_decl(&mut self) -> Result<WorkerDecl> {
        let start = self.current_span();
        let kind = if self.eat(&TokenKind::Side) {
            self.expect(&TokenKind::Quest)?;
            WorkerKind::SideQuest
        } else {
            self.expect(&TokenKind::Worker)?;
            WorkerKind::Worker
        };
        let name = self.expect_identifier()?;
        let body = self.parse_block()?;
        Ok(WorkerDecl {
            kind,
            name,
            body,
            span: start.merge(self.previous_span()),
        })
    }

    /// `"const" Ident [ ":" Type ] "=" Expr ";"`
    fn parse_const_decl(&mut self) -> Result<ConstDecl> {
        let start = self.expect(&TokenKind::Const)?.span;
        let name = self.expect_identifier()?;
        let type_ann = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type_annotation()?)
        } else {
            None
        };
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expression()?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(ConstDecl {
            name,
            type_ann,
            value,
            span: start.merge(self.previous_span()),
        })
    }
}
