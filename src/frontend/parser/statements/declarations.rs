//! Function and variable declarations

use crate::frontend::lexer::tokens::*;
use crate::frontend::parser::ast::*;
use crate::frontend::parser::pratt::BP_ASSIGN;
use crate::frontend::parser::{ParseError, ParserState};

impl ParserState<'_> {
    /// `function name(a, b) { ... }`
    pub fn parse_function_decl(&mut self) -> Result<Node, ParseError> {
        let start = self.span();
        self.expect(&TokenKind::KwFunction)?;
        let name = self.expect_identifier()?;

        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.at(&TokenKind::RParen) {
            params.push(self.expect_identifier()?);
            if !self.skip(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;

        let body = self.parse_block_body()?;
        let span = start.to(self.prev_span());
        Ok(Node::new(
            NodeKind::Function(Function {
                name,
                params,
                body,
                span,
            }),
            span,
        ))
    }

    /// `var a = 1, b` without the trailing semicolon
    pub fn parse_var_decl_list(&mut self) -> Result<Node, ParseError> {
        let start = self.span();
        let kind = match self.bump().map(|t| t.kind) {
            Some(TokenKind::KwVar) => DeclKind::Var,
            Some(TokenKind::KwLet) => DeclKind::Let,
            Some(TokenKind::KwConst) => DeclKind::Const,
            _ => return Err(self.unexpected()),
        };

        let mut declarations = Vec::new();
        loop {
            let decl_start = self.span();
            let name = self.expect_identifier()?;
            let init = if self.skip(&TokenKind::Eq) {
                Some(Box::new(self.parse_expression(BP_ASSIGN)?))
            } else {
                None
            };
            declarations.push(Node::new(
                NodeKind::VarDecl { name, init },
                decl_start.to(self.prev_span()),
            ));
            if !self.skip(&TokenKind::Comma) {
                break;
            }
        }

        Ok(Node::new(
            NodeKind::VarDeclList { kind, declarations },
            start.to(self.prev_span()),
        ))
    }
}
