//! Keyword recognition

use crate::frontend::lexer::tokens::TokenKind;

/// Convert an identifier-shaped word to its keyword token, if any
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s {
        // Declarations
        "function" => Some(TokenKind::KwFunction),
        "var" => Some(TokenKind::KwVar),
        "let" => Some(TokenKind::KwLet),
        "const" => Some(TokenKind::KwConst),

        // Control flow keywords
        "if" => Some(TokenKind::KwIf),
        "else" => Some(TokenKind::KwElse),
        "for" => Some(TokenKind::KwFor),
        "while" => Some(TokenKind::KwWhile),
        "return" => Some(TokenKind::KwReturn),
        "break" => Some(TokenKind::KwBreak),
        "continue" => Some(TokenKind::KwContinue),
        "throw" => Some(TokenKind::KwThrow),

        // Keyword operators
        "typeof" => Some(TokenKind::KwTypeof),
        "void" => Some(TokenKind::KwVoid),

        // Literals
        "true" => Some(TokenKind::BoolLiteral(true)),
        "false" => Some(TokenKind::BoolLiteral(false)),
        "null" => Some(TokenKind::NullLiteral),

        _ => None,
    }
}
