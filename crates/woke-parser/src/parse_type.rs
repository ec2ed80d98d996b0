//! Type annotation parsing.

use woke_lexer::token::TokenKind;
use woke_types::ast::*;
use woke_types::Result;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// Parse a type annotation.
    ///
    /// ```ebnf
    /// Type = "String" | "Int" | "Float" | "Bool"
    ///      | "[" Type "]"
    ///      | "Maybe" Type
    ///      | Identifier ;
    /// ```
    pub(crate) fn parse_type_annotation(&mut self) -> Result<TypeAnnotation> {
        let start = self.current_span();
        let kind = match self.peek_kind() {
            TokenKind::KwString => {
                self.advance();
                TypeKind::String
            }
            TokenKind::KwInt => {
                self.advance();
                TypeKind::Int
            }
            TokenKind::KwFloat => {
                self.advance();
                TypeKind::Float
            }
            TokenKind::KwBool => {
                self.advance();
                TypeKind::Bool
            }
            TokenKind::LBracket => {
                self.advance();
                let element = self.nested(Self::parse_type_annotation)?;
                self.expect(&TokenKind::RBracket)?;
                TypeKind::Array(Box::new(element))
            }
            TokenKind::Maybe => {
                self.advance();
                TypeKind::Maybe(Box::new(self.nested(Self::parse_type_annotation)?))
            }
            TokenKind::Identifier(_) => TypeKind::Named(self.expect_identifier()?.name),
            _ => return Err(self.unexpected("type")),
        };
        Ok(TypeAnnotation {
            kind,
            span: start.merge(self.previous_span()),
        })
    }
}
