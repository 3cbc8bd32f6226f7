//! Parser state and error handling

use crate::frontend::lexer::tokens::*;
use crate::util::span::Span;
use thiserror::Error;

/// Parse error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Expected a specific token
    #[error("Expected {expected:?}, found {found:?} at {span}")]
    ExpectedToken {
        expected: TokenKind,
        found: TokenKind,
        span: Span,
    },
    /// Unexpected token encountered
    #[error("Unexpected token {found:?} at {span}")]
    UnexpectedToken { found: TokenKind, span: Span },
    /// Left-hand side of an assignment or update is not assignable
    #[error("Invalid assignment target at {span}")]
    InvalidAssignmentTarget { span: Span },
    /// Syntax outside the accepted subset
    #[error("Unsupported syntax at {span}: {message}")]
    Unsupported { message: String, span: Span },
}

/// Parser state for Pratt parsing
pub struct ParserState<'a> {
    tokens: &'a [Token],
    pos: usize,
    prev_span: Span,
}

impl<'a> ParserState<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            prev_span: Span::dummy(),
        }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
            || matches!(self.current().map(|t| &t.kind), Some(TokenKind::Eof))
    }

    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn current_kind(&self) -> TokenKind {
        self.current()
            .map(|t| t.kind.clone())
            .unwrap_or(TokenKind::Eof)
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1)
    }

    /// Span of the current token
    pub fn span(&self) -> Span {
        self.current().map(|t| t.span).unwrap_or(self.prev_span)
    }

    /// Span of the most recently consumed token
    pub fn prev_span(&self) -> Span {
        self.prev_span
    }

    pub fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        self.prev_span = token.span;
        Some(token)
    }

    pub fn at(
        &self,
        kind: &TokenKind,
    ) -> bool {
        if let Some(current) = self.current() {
            &current.kind == kind
        } else {
            false
        }
    }

    pub fn skip(
        &mut self,
        kind: &TokenKind,
    ) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub fn expect(
        &mut self,
        kind: &TokenKind,
    ) -> Result<Token, ParseError> {
        if self.at(kind) {
            if let Some(token) = self.bump() {
                return Ok(token);
            }
        }
        Err(ParseError::ExpectedToken {
            expected: kind.clone(),
            found: self.current_kind(),
            span: self.span(),
        })
    }

    /// Consume an identifier and return its name
    pub fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match self.current_kind() {
            TokenKind::Identifier(name) => {
                self.bump();
                Ok(name)
            }
            found => Err(ParseError::ExpectedToken {
                expected: TokenKind::Identifier(String::new()),
                found,
                span: self.span(),
            }),
        }
    }

    /// Error for the current token
    pub fn unexpected(&self) -> ParseError {
        ParseError::UnexpectedToken {
            found: self.current_kind(),
            span: self.span(),
        }
    }

    /// Optional statement terminator
    pub fn skip_semicolon(&mut self) {
        self.skip(&TokenKind::Semicolon);
    }
}
