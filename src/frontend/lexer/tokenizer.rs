//! Tokenizer implementation
//! Main lexer structure and token generation logic

use super::literals::{is_digit, is_identifier_char, is_identifier_start, scan_number, scan_string};
use super::state::keyword_from_str;
use crate::frontend::lexer::tokens::*;
use crate::util::span::{Position, Span};
use std::iter::Peekable;
use std::str::Chars;

/// Main lexer structure
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<Chars<'a>>,
    offset: usize,
    line: usize,
    column: usize,
    start_offset: usize,
    start_line: usize,
    start_column: usize,
    /// First error hit; lexing stops there
    pub error: Option<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().peekable(),
            offset: 0,
            line: 1,
            column: 1,
            start_offset: 0,
            start_line: 1,
            start_column: 1,
            error: None,
        }
    }

    /// Get current position
    pub fn position(&self) -> Position {
        Position::with_offset(self.line, self.column, self.offset)
    }

    /// Get start position of current token
    pub fn start_position(&self) -> Position {
        Position::with_offset(self.start_line, self.start_column, self.start_offset)
    }

    /// Get span of current token
    pub fn span(&self) -> Span {
        Span::new(self.start_position(), self.position())
    }

    /// Advance to next character
    pub fn advance(&mut self) -> Option<char> {
        match self.chars.next() {
            Some('\n') => {
                self.offset += 1;
                self.line += 1;
                self.column = 1;
                Some('\n')
            }
            Some(c) => {
                self.offset += c.len_utf8();
                self.column += 1;
                Some(c)
            }
            None => None,
        }
    }

    /// Peek at next character
    pub fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    /// Peek at character after next
    pub fn peek_next(&self) -> Option<char> {
        self.chars.clone().nth(1)
    }

    /// Consume the next character if it equals `expected`
    fn eat(
        &mut self,
        expected: char,
    ) -> bool {
        if self.peek() == Some(&expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Record an error; lexing stops after the current token
    pub fn fail(
        &mut self,
        error: LexError,
    ) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&c) = self.peek() {
            match c {
                c if c.is_whitespace() => {
                    self.advance();
                }
                '/' if self.peek_next() == Some('/') => {
                    while let Some(&c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                '/' if self.peek_next() == Some('*') => {
                    self.start_offset = self.offset;
                    self.start_line = self.line;
                    self.start_column = self.column;
                    self.advance();
                    self.advance();
                    let mut closed = false;
                    while let Some(c) = self.advance() {
                        if c == '*' && self.eat('/') {
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        let span = self.span();
                        self.fail(LexError::UnterminatedComment { span });
                        return;
                    }
                }
                _ => break,
            }
        }
    }

    /// Generate next token
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();
        if self.error.is_some() {
            return None;
        }

        self.start_offset = self.offset;
        self.start_line = self.line;
        self.start_column = self.column;

        let c = self.advance()?;

        let kind = match c {
            c if is_identifier_start(c) => return Some(self.scan_identifier(c)),
            c if is_digit(c) => return scan_number(self, c),
            '.' if self.peek().map(|c| is_digit(*c)).unwrap_or(false) => {
                return scan_number(self, c)
            }
            '"' | '\'' => return scan_string(self, c),
            '+' => {
                if self.eat('+') {
                    TokenKind::PlusPlus
                } else if self.eat('=') {
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.eat('-') {
                    TokenKind::MinusMinus
                } else if self.eat('=') {
                    TokenKind::MinusEq
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.eat('=') {
                    TokenKind::StarEq
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.eat('=') {
                    TokenKind::SlashEq
                } else {
                    TokenKind::Slash
                }
            }
            '%' => {
                if self.eat('=') {
                    TokenKind::PercentEq
                } else {
                    TokenKind::Percent
                }
            }
            '=' => {
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::EqEqEq
                    } else {
                        TokenKind::EqEq
                    }
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::NeqEq
                    } else {
                        TokenKind::Neq
                    }
                } else {
                    TokenKind::Not
                }
            }
            '<' => {
                if self.eat('<') {
                    if self.eat('=') {
                        TokenKind::ShlEq
                    } else {
                        TokenKind::Shl
                    }
                } else if self.eat('=') {
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('>') {
                    if self.eat('>') {
                        if self.eat('=') {
                            TokenKind::UShrEq
                        } else {
                            TokenKind::UShr
                        }
                    } else if self.eat('=') {
                        TokenKind::ShrEq
                    } else {
                        TokenKind::Shr
                    }
                } else if self.eat('=') {
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '&' => {
                if self.eat('&') {
                    TokenKind::And
                } else if self.eat('=') {
                    TokenKind::AmpEq
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::Or
                } else if self.eat('=') {
                    TokenKind::PipeEq
                } else {
                    TokenKind::Pipe
                }
            }
            '^' => {
                if self.eat('=') {
                    TokenKind::CaretEq
                } else {
                    TokenKind::Caret
                }
            }
            '~' => TokenKind::Tilde,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,
            c => {
                let span = self.span();
                self.fail(LexError::UnexpectedChar { ch: c, span });
                return None;
            }
        };

        Some(self.make_token(kind))
    }

    /// Scan identifier or keyword token
    fn scan_identifier(
        &mut self,
        first_char: char,
    ) -> Token {
        let mut value = String::new();
        value.push(first_char);

        while let Some(&c) = self.peek() {
            if is_identifier_char(c) {
                value.push(c);
                self.advance();
            } else {
                break;
            }
        }

        match keyword_from_str(&value) {
            Some(kind) => self.make_token(kind),
            None => self.make_token(TokenKind::Identifier(value)),
        }
    }

    /// Create token with current span and raw text
    pub fn make_token(
        &self,
        kind: TokenKind,
    ) -> Token {
        let span = self.span();
        let raw = span.slice(self.source).unwrap_or_default().to_string();
        Token { kind, span, raw }
    }
}
