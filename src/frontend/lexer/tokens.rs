//! Token types

use crate::util::span::Span;

/// Lexer error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("Unterminated string starting at {span}")]
    UnterminatedString { span: Span },
    #[error("Unterminated block comment starting at {span}")]
    UnterminatedComment { span: Span },
    #[error("Invalid escape sequence `{sequence}` at {span}")]
    InvalidEscape { sequence: String, span: Span },
    #[error("Invalid number literal `{text}` at {span}")]
    InvalidNumber { text: String, span: Span },
    #[error("Unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },
}

/// Token kind
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    KwFunction,
    KwVar,
    KwLet,
    KwConst,
    KwIf,
    KwElse,
    KwFor,
    KwWhile,
    KwReturn,
    KwBreak,
    KwContinue,
    KwThrow,
    KwTypeof,
    KwVoid,

    // Identifiers
    Identifier(String),

    // Literals
    NumberLiteral(f64),
    StringLiteral(String),
    BoolLiteral(bool),
    NullLiteral,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,

    // Assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    ShlEq,
    ShrEq,
    UShrEq,
    AmpEq,
    PipeEq,
    CaretEq,

    // Comparison
    EqEq,
    Neq,
    EqEqEq,
    NeqEq,
    Lt,
    Le,
    Gt,
    Ge,

    // Bitwise and logical
    Shl,
    Shr,
    UShr,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Not,
    And,
    Or,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Question,

    // Special
    Eof,
}

impl TokenKind {
    /// Check whether the token is an assignment operator
    pub fn is_assign_op(&self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq
                | TokenKind::ShlEq
                | TokenKind::ShrEq
                | TokenKind::UShrEq
                | TokenKind::AmpEq
                | TokenKind::PipeEq
                | TokenKind::CaretEq
        )
    }
}

/// Token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Source text of the token, kept so literals reproduce verbatim
    pub raw: String,
}

impl From<TokenKind> for Token {
    fn from(kind: TokenKind) -> Self {
        Token {
            kind,
            span: Span::dummy(),
            raw: String::new(),
        }
    }
}
