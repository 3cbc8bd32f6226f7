//! Parser module
//!
//! Implements a Pratt Parser for the JavaScript subset the specializer reads.
//! This module provides the main entry points for parsing tokens into AST.

pub mod ast;
pub mod parser_state;
pub mod pratt;
pub mod statements;
#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use ast::*;
pub use parser_state::{ParseError, ParserState};
pub use pratt::BP_LOWEST;

use crate::frontend::lexer::tokens::*;

/// Parse tokens into a program
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    let mut state = ParserState::new(tokens);
    let mut body = Vec::new();

    while !state.at_end() {
        // Skip empty statements (like stray semicolons)
        if state.skip(&TokenKind::Semicolon) {
            continue;
        }
        body.push(state.parse_statement()?);
    }

    tracing::debug!("Parsed {} top-level statements", body.len());
    Ok(Program { body })
}

/// Parse a single expression; trailing tokens are an error
pub fn parse_expression(tokens: &[Token]) -> Result<Node, ParseError> {
    let mut state = ParserState::new(tokens);
    let expr = state.parse_expression(BP_LOWEST)?;
    if !state.at_end() {
        return Err(state.unexpected());
    }
    Ok(expr)
}
