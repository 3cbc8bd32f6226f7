//! Control flow statements: if, for, while, return

use crate::frontend::lexer::tokens::*;
use crate::frontend::parser::ast::*;
use crate::frontend::parser::pratt::BP_LOWEST;
use crate::frontend::parser::{ParseError, ParserState};

impl ParserState<'_> {
    /// `if (test) stmt [else stmt]`
    pub fn parse_if_stmt(&mut self) -> Result<Node, ParseError> {
        let start = self.span();
        self.expect(&TokenKind::KwIf)?;
        self.expect(&TokenKind::LParen)?;
        let test = self.parse_expression(BP_LOWEST)?;
        self.expect(&TokenKind::RParen)?;

        let consequent = self.parse_statement()?;
        let alternate = if self.skip(&TokenKind::KwElse) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Node::new(
            NodeKind::If {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate,
            },
            start.to(self.prev_span()),
        ))
    }

    /// `for (init; test; update) stmt`
    pub fn parse_for_stmt(&mut self) -> Result<Node, ParseError> {
        let start = self.span();
        self.expect(&TokenKind::KwFor)?;
        self.expect(&TokenKind::LParen)?;

        let init = match self.current_kind() {
            TokenKind::Semicolon => None,
            TokenKind::KwVar | TokenKind::KwLet | TokenKind::KwConst => {
                Some(Box::new(self.parse_var_decl_list()?))
            }
            _ => Some(Box::new(self.parse_expression(BP_LOWEST)?)),
        };
        if !self.at(&TokenKind::Semicolon) {
            return Err(ParseError::Unsupported {
                message: "only three-clause for loops are accepted".to_string(),
                span: self.span(),
            });
        }
        self.bump();

        let test = if self.at(&TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression(BP_LOWEST)?))
        };
        self.expect(&TokenKind::Semicolon)?;

        let update = if self.at(&TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.parse_expression(BP_LOWEST)?))
        };
        self.expect(&TokenKind::RParen)?;

        let body = self.parse_statement()?;
        Ok(Node::new(
            NodeKind::For {
                init,
                test,
                update,
                body: Box::new(body),
            },
            start.to(self.prev_span()),
        ))
    }

    /// `while (test) stmt`
    pub fn parse_while_stmt(&mut self) -> Result<Node, ParseError> {
        let start = self.span();
        self.expect(&TokenKind::KwWhile)?;
        self.expect(&TokenKind::LParen)?;
        let test = self.parse_expression(BP_LOWEST)?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_statement()?;
        Ok(Node::new(
            NodeKind::While {
                test: Box::new(test),
                body: Box::new(body),
            },
            start.to(self.prev_span()),
        ))
    }

    /// `return [expr];`
    pub fn parse_return_stmt(&mut self) -> Result<Node, ParseError> {
        let start = self.span();
        self.expect(&TokenKind::KwReturn)?;
        let argument = match self.current_kind() {
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => None,
            _ => Some(Box::new(self.parse_expression(BP_LOWEST)?)),
        };
        self.skip_semicolon();
        Ok(Node::new(
            NodeKind::Return(argument),
            start.to(self.prev_span()),
        ))
    }
}
