//! Prefix (null denotation) parsing: primaries and prefix operators

use super::precedence::*;
use crate::frontend::lexer::tokens::*;
use crate::frontend::parser::ast::*;
use crate::frontend::parser::{ParseError, ParserState};

impl ParserState<'_> {
    /// Parse a prefix expression
    pub(crate) fn parse_prefix(&mut self) -> Result<Node, ParseError> {
        let start = self.span();
        let token = self.current().cloned().ok_or_else(|| self.unexpected())?;

        match &token.kind {
            TokenKind::NumberLiteral(value) => {
                self.bump();
                Ok(Node::new(
                    NodeKind::Literal(Literal::Number {
                        value: *value,
                        raw: token.raw.clone(),
                    }),
                    start,
                ))
            }
            TokenKind::StringLiteral(value) => {
                self.bump();
                Ok(Node::new(
                    NodeKind::Literal(Literal::String {
                        value: value.clone(),
                        raw: token.raw.clone(),
                    }),
                    start,
                ))
            }
            TokenKind::BoolLiteral(b) => {
                self.bump();
                Ok(Node::new(NodeKind::Literal(Literal::Bool(*b)), start))
            }
            TokenKind::NullLiteral => {
                self.bump();
                Ok(Node::new(NodeKind::Literal(Literal::Null), start))
            }
            TokenKind::Identifier(name) => {
                self.bump();
                Ok(Node::new(NodeKind::Identifier(name.clone()), start))
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expression(BP_LOWEST)?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                self.bump();
                let op = if token.kind == TokenKind::PlusPlus {
                    UpdateOp::Increment
                } else {
                    UpdateOp::Decrement
                };
                let argument = self.parse_expression(BP_UNARY)?;
                ensure_assignable(&argument)?;
                let span = start.to(argument.span);
                Ok(Node::new(
                    NodeKind::Update {
                        op,
                        argument: Box::new(argument),
                        prefix: true,
                    },
                    span,
                ))
            }
            TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Not
            | TokenKind::Tilde
            | TokenKind::KwTypeof
            | TokenKind::KwVoid => {
                self.bump();
                let op = match token.kind {
                    TokenKind::Minus => UnaryOp::Neg,
                    TokenKind::Plus => UnaryOp::Plus,
                    TokenKind::Not => UnaryOp::Not,
                    TokenKind::Tilde => UnaryOp::BitNot,
                    TokenKind::KwTypeof => UnaryOp::Typeof,
                    _ => UnaryOp::Void,
                };
                let argument = self.parse_expression(BP_UNARY)?;
                let span = start.to(argument.span);
                Ok(Node::new(
                    NodeKind::Unary {
                        op,
                        argument: Box::new(argument),
                    },
                    span,
                ))
            }
            TokenKind::KwFunction => Err(ParseError::Unsupported {
                message: "function expressions".to_string(),
                span: start,
            }),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_array_literal(&mut self) -> Result<Node, ParseError> {
        let start = self.span();
        self.expect(&TokenKind::LBracket)?;
        let mut elements = Vec::new();
        while !self.at(&TokenKind::RBracket) {
            elements.push(self.parse_expression(BP_ASSIGN)?);
            if !self.skip(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(Node::new(NodeKind::Array(elements), start.to(self.prev_span())))
    }

    fn parse_object_literal(&mut self) -> Result<Node, ParseError> {
        let start = self.span();
        self.expect(&TokenKind::LBrace)?;
        let mut properties = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            let key_span = self.span();
            let key = match self.current_kind() {
                TokenKind::Identifier(name) => name,
                TokenKind::StringLiteral(value) => value,
                TokenKind::NumberLiteral(_) => self
                    .current()
                    .map(|t| t.raw.clone())
                    .unwrap_or_default(),
                _ => return Err(self.unexpected()),
            };
            let shorthand_ok = matches!(self.current_kind(), TokenKind::Identifier(_));
            self.bump();

            let value = if self.skip(&TokenKind::Colon) {
                self.parse_expression(BP_ASSIGN)?
            } else if shorthand_ok {
                Node::new(NodeKind::Identifier(key.clone()), key_span)
            } else {
                return Err(self.unexpected());
            };
            properties.push(Property { key, value });

            if !self.skip(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Node::new(
            NodeKind::Object(properties),
            start.to(self.prev_span()),
        ))
    }
}

/// Only identifiers and member expressions may be assigned or updated
pub(crate) fn ensure_assignable(node: &Node) -> Result<(), ParseError> {
    match node.kind {
        NodeKind::Identifier(_) | NodeKind::Member { .. } => Ok(()),
        _ => Err(ParseError::InvalidAssignmentTarget { span: node.span }),
    }
}
