//! Statement parsing

pub mod control_flow;
pub mod declarations;

use crate::frontend::lexer::tokens::*;
use crate::frontend::parser::ast::*;
use crate::frontend::parser::pratt::BP_LOWEST;
use crate::frontend::parser::{ParseError, ParserState};

impl ParserState<'_> {
    /// Parse a statement
    pub fn parse_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.span();

        match self.current_kind() {
            TokenKind::KwFunction => self.parse_function_decl(),
            TokenKind::KwVar | TokenKind::KwLet | TokenKind::KwConst => {
                let decl = self.parse_var_decl_list()?;
                self.skip_semicolon();
                Ok(decl)
            }
            TokenKind::KwIf => self.parse_if_stmt(),
            TokenKind::KwFor => self.parse_for_stmt(),
            TokenKind::KwWhile => self.parse_while_stmt(),
            TokenKind::KwReturn => self.parse_return_stmt(),
            TokenKind::KwBreak => {
                self.bump();
                self.skip_semicolon();
                Ok(Node::new(NodeKind::Break, start))
            }
            TokenKind::KwContinue => {
                self.bump();
                self.skip_semicolon();
                Ok(Node::new(NodeKind::Continue, start))
            }
            TokenKind::KwThrow => {
                self.bump();
                let argument = self.parse_expression(BP_LOWEST)?;
                self.skip_semicolon();
                let span = start.to(argument.span);
                Ok(Node::new(NodeKind::Throw(Box::new(argument)), span))
            }
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Semicolon => {
                self.bump();
                Ok(Node::new(NodeKind::Empty, start))
            }
            TokenKind::Eof => Err(self.unexpected()),
            _ => {
                let expr = self.parse_expression(BP_LOWEST)?;
                self.skip_semicolon();
                let span = expr.span;
                Ok(Node::new(NodeKind::ExpressionStatement(Box::new(expr)), span))
            }
        }
    }

    /// `{ stmt* }`
    pub fn parse_block(&mut self) -> Result<Node, ParseError> {
        let start = self.span();
        let body = self.parse_block_body()?;
        Ok(Node::new(NodeKind::Block(body), start.to(self.prev_span())))
    }

    /// `{ stmt* }`, returning the statements
    pub(crate) fn parse_block_body(&mut self) -> Result<Vec<Node>, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            if self.at_end() {
                return Err(ParseError::ExpectedToken {
                    expected: TokenKind::RBrace,
                    found: TokenKind::Eof,
                    span: self.span(),
                });
            }
            body.push(self.parse_statement()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(body)
    }
}
