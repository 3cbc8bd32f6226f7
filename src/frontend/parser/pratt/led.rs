//! Infix and postfix (left denotation) parsing

use super::nud::ensure_assignable;
use super::precedence::*;
use crate::frontend::lexer::tokens::*;
use crate::frontend::parser::ast::*;
use crate::frontend::parser::{ParseError, ParserState};

impl ParserState<'_> {
    /// `callee(args)`
    pub(crate) fn parse_call(
        &mut self,
        callee: Node,
    ) -> Result<Node, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.at(&TokenKind::RParen) {
            args.push(self.parse_expression(BP_ASSIGN)?);
            if !self.skip(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        let span = callee.span.to(self.prev_span());
        Ok(Node::new(
            NodeKind::Call {
                callee: Box::new(callee),
                args,
            },
            span,
        ))
    }

    /// `object.name` / `object[expr]`
    pub(crate) fn parse_member(
        &mut self,
        object: Node,
    ) -> Result<Node, ParseError> {
        let (property, computed) = if self.skip(&TokenKind::Dot) {
            let span = self.span();
            let name = self.expect_identifier()?;
            (Node::new(NodeKind::Identifier(name), span), false)
        } else {
            self.expect(&TokenKind::LBracket)?;
            let index = self.parse_expression(BP_LOWEST)?;
            self.expect(&TokenKind::RBracket)?;
            (index, true)
        };
        let span = object.span.to(self.prev_span());
        Ok(Node::new(
            NodeKind::Member {
                object: Box::new(object),
                property: Box::new(property),
                computed,
            },
            span,
        ))
    }

    /// `target++` / `target--`
    pub(crate) fn parse_postfix_update(
        &mut self,
        argument: Node,
    ) -> Result<Node, ParseError> {
        ensure_assignable(&argument)?;
        let op = match self.bump().map(|t| t.kind) {
            Some(TokenKind::PlusPlus) => UpdateOp::Increment,
            _ => UpdateOp::Decrement,
        };
        let span = argument.span.to(self.prev_span());
        Ok(Node::new(
            NodeKind::Update {
                op,
                argument: Box::new(argument),
                prefix: false,
            },
            span,
        ))
    }

    /// `test ? consequent : alternate`
    pub(crate) fn parse_conditional(
        &mut self,
        test: Node,
    ) -> Result<Node, ParseError> {
        self.expect(&TokenKind::Question)?;
        let consequent = self.parse_expression(BP_ASSIGN)?;
        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_expression(BP_ASSIGN)?;
        let span = test.span.to(alternate.span);
        Ok(Node::new(
            NodeKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            span,
        ))
    }

    /// `target op= value`, right associative
    pub(crate) fn parse_assignment(
        &mut self,
        target: Node,
        op: AssignOp,
    ) -> Result<Node, ParseError> {
        ensure_assignable(&target)?;
        self.bump();
        let value = self.parse_expression(BP_ASSIGN)?;
        let span = target.span.to(value.span);
        Ok(Node::new(
            NodeKind::Assignment {
                target: Box::new(target),
                op,
                value: Box::new(value),
            },
            span,
        ))
    }
}
