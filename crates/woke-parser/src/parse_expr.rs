//! Expression parsing with full operator precedence.
//!
//! Precedence (lowest → highest), binary levels left-associative:
//! 7. `or`
//! 6. `and`
//! 5. `==`, `!=`
//! 4. `<`, `>`, `<=`, `>=`
//! 3. `+`, `-`
//! 2. `*`, `/`, `%`
//! 1. unary `-`, `not` (right-associative)
//! 0. postfix `measured in unit`, then primaries including calls

use woke_lexer::token::TokenKind;
use woke_types::ast::*;
use woke_types::Result;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    pub(crate) fn parse_expression(&mut self) -> Result<Expr> {
        self.nested(Self::parse_or)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `Operand { Op Operand }`, folded to the left. `op_for` maps the tokens
    /// owned by this level to operators; `operand` parses one level tighter.
    fn parse_binary_level(
        &mut self,
        op_for: fn(&TokenKind) -> Option<BinOp>,
        operand: fn(&mut Self) -> Result<Expr>,
    ) -> Result<Expr> {
        let mut left = operand(self)?;
        while let Some(op) = op_for(self.peek_kind()) {
            self.advance();
            let right = operand(self)?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        self.parse_binary_level(
            |k| matches!(k, TokenKind::Or).then_some(BinOp::Or),
            Self::parse_and,
        )
    }

    fn parse_and(&mut self) -> Result<Expr> {
        self.parse_binary_level(
            |k| matches!(k, TokenKind::And).then_some(BinOp::And),
            Self::parse_equality,
        )
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        self.parse_binary_level(
            |k| match k {
                TokenKind::EqEq => Some(BinOp::Eq),
                TokenKind::BangEq => Some(BinOp::NotEq),
                _ => None,
            },
            Self::parse_comparison,
        )
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        self.parse_binary_level(
            |k| match k {
                TokenKind::Less => Some(BinOp::Less),
                TokenKind::Greater => Some(BinOp::Greater),
                TokenKind::LessEq => Some(BinOp::LessEq),
                TokenKind::GreaterEq => Some(BinOp::GreaterEq),
                _ => None,
            },
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        self.parse_binary_level(
            |k| match k {
                TokenKind::Plus => Some(BinOp::Add),
                TokenKind::Minus => Some(BinOp::Sub),
                _ => None,
            },
            Self::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        self.parse_binary_level(
            |k| match k {
                TokenKind::Star => Some(BinOp::Mul),
                TokenKind::Slash => Some(BinOp::Div),
                TokenKind::Percent => Some(BinOp::Mod),
                _ => None,
            },
            Self::parse_unary,
        )
    }

    /// `UnaryExpr = ( "-" | "not" ) UnaryExpr | PostfixExpr`
    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.peek_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        let start = self.advance().span;
        let operand = self.nested(Self::parse_unary)?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// `PostfixExpr = Primary { "measured" "in" Ident }`
    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        while self.eat(&TokenKind::Measured) {
            self.expect(&TokenKind::In)?;
            let unit = self.expect_identifier()?;
            let span = expr.span.merge(unit.span);
            expr = Expr::new(
                ExprKind::Measured {
                    value: Box::new(expr),
                    unit,
                },
                span,
            );
        }
        Ok(expr)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> Result<Expr> {
        let start = self.current_span();
        let kind = match self.peek_kind() {
            TokenKind::IntLiteral(n) => {
                let n = *n;
                self.advance();
                ExprKind::IntLit(n)
            }
            TokenKind::FloatLiteral { value, .. } => {
                let n = *value;
                self.advance();
                ExprKind::FloatLit(n)
            }
            TokenKind::StringLiteral(_) => ExprKind::StringLit(self.expect_string_literal()?),
            TokenKind::True => {
                self.advance();
                ExprKind::BoolLit(true)
            }
            TokenKind::False => {
                self.advance();
                ExprKind::BoolLit(false)
            }
            TokenKind::Identifier(_) => {
                let name = self.expect_identifier()?;
                if self.check(&TokenKind::LParen) {
                    let args = self.parse_call_args()?;
                    ExprKind::Call { name, args }
                } else {
                    ExprKind::Identifier(name.name)
                }
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                while !self.check(&TokenKind::RBracket) {
                    elements.push(self.parse_expression()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RBracket)?;
                ExprKind::ArrayLit(elements)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(Expr::new(inner.kind, start.merge(self.previous_span())));
            }
            TokenKind::Thanks => {
                self.advance();
                self.expect(&TokenKind::LParen)?;
                let contributor = self.expect_string_literal()?;
                self.expect(&TokenKind::RParen)?;
                ExprKind::Thanks(contributor)
            }
            _ => return Err(self.unexpected("expression")),
        };
        Ok(Expr::new(kind, start.merge(self.previous_span())))
    }

    /// `"(" [ Expr { "," Expr } ] ")"`
    fn parse_call_args(&mut self) -> Result<Vec<Expr>> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }
}
