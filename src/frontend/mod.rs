//! Frontend
//!
//! Turns subject source text into a `Program` and finds the functions that
//! are flagged for specialization.

use thiserror::Error;
use tracing::debug;

pub mod discovery;
pub mod lexer;
pub mod parser;

pub use discovery::{discover, Candidate};
pub use parser::ast::{Function, Node, NodeKind, Program};

/// Frontend errors
#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("Lexical error: {0}")]
    Lex(#[from] lexer::LexError),

    #[error("Parse error: {0}")]
    Parse(#[from] parser::ParseError),
}

/// Lex and parse a subject source file
pub fn parse_program(source: &str) -> Result<Program, FrontendError> {
    debug!("Parsing source ({} bytes)", source.len());
    let tokens = lexer::tokenize(source)?;
    let program = parser::parse(&tokens)?;
    debug!(
        "Parsed {} statements, {} functions",
        program.body.len(),
        program.functions().count()
    );
    Ok(program)
}
