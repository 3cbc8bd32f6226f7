//! Lexer module
//! Tokenizes the JavaScript subset accepted by the specializer

pub mod literals;
pub mod state;
pub mod tokenizer;
pub mod tokens;

// Re-export types
pub use tokenizer::Lexer;
pub use tokens::{LexError, Token, TokenKind};

/// Tokenize source code, appending a trailing `Eof` token
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    tracing::debug!("Lexing {} bytes", source.len());

    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }

    if let Some(err) = lexer.error {
        return Err(err);
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: crate::util::span::Span::new(lexer.position(), lexer.position()),
        raw: String::new(),
    });
    tracing::debug!("Lexed {} tokens", tokens.len());
    Ok(tokens)
}
