//! Literal scanning implementations
//! Handles number and string literals

use super::tokenizer::Lexer;
use crate::frontend::lexer::tokens::*;

/// Check if character can start an identifier
pub fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || unicode_ident::is_xid_start(c)
}

/// Check if character can continue an identifier
pub fn is_identifier_char(c: char) -> bool {
    c == '$' || unicode_ident::is_xid_continue(c)
}

/// Check if character is a decimal digit
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Scan a number literal (decimal with optional fraction/exponent, or hex)
pub fn scan_number(
    lexer: &mut Lexer<'_>,
    first_char: char,
) -> Option<Token> {
    let mut text = String::new();
    text.push(first_char);

    let value = if first_char == '0' && matches!(lexer.peek(), Some(&'x') | Some(&'X')) {
        if let Some(x) = lexer.advance() {
            text.push(x);
        }
        let digits_start = text.len();
        while let Some(&c) = lexer.peek() {
            if c.is_ascii_hexdigit() {
                text.push(c);
                lexer.advance();
            } else {
                break;
            }
        }
        hex_value(&text[digits_start..])
    } else {
        scan_decimal_digits(lexer, &mut text);
        if first_char != '.' && lexer.peek() == Some(&'.') {
            text.push('.');
            lexer.advance();
            scan_decimal_digits(lexer, &mut text);
        }
        if matches!(lexer.peek(), Some(&'e') | Some(&'E')) {
            if let Some(e) = lexer.advance() {
                text.push(e);
            }
            if let Some(&sign) = lexer.peek() {
                if sign == '+' || sign == '-' {
                    text.push(sign);
                    lexer.advance();
                }
            }
            scan_decimal_digits(lexer, &mut text);
        }
        text.parse::<f64>().ok()
    };

    // `3in` / `1.2.3`: a number may not run straight into an identifier
    let runs_on = lexer
        .peek()
        .map(|&c| is_identifier_char(c) || c == '.')
        .unwrap_or(false);

    match value {
        Some(v) if !runs_on => Some(lexer.make_token(TokenKind::NumberLiteral(v))),
        _ => {
            let span = lexer.span();
            lexer.fail(LexError::InvalidNumber { text, span });
            None
        }
    }
}

fn scan_decimal_digits(
    lexer: &mut Lexer<'_>,
    text: &mut String,
) {
    while let Some(&c) = lexer.peek() {
        if is_digit(c) {
            text.push(c);
            lexer.advance();
        } else {
            break;
        }
    }
}

/// Value of a run of hex digits, of any length; `None` when empty or not hex
pub fn hex_value(digits: &str) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(16).map(|d| acc * 16.0 + f64::from(d))
    })
}

/// Scan a single- or double-quoted string literal
pub fn scan_string(
    lexer: &mut Lexer<'_>,
    quote: char,
) -> Option<Token> {
    let mut value = String::new();

    loop {
        let c = match lexer.advance() {
            Some(c) => c,
            None => {
                let span = lexer.span();
                lexer.fail(LexError::UnterminatedString { span });
                return None;
            }
        };

        match c {
            c if c == quote => break,
            '\n' => {
                let span = lexer.span();
                lexer.fail(LexError::UnterminatedString { span });
                return None;
            }
            '\\' => {
                let escaped = match lexer.advance() {
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some('r') => '\r',
                    Some('0') => '\0',
                    Some('b') => '\u{8}',
                    Some('f') => '\u{c}',
                    Some('v') => '\u{b}',
                    Some('\\') => '\\',
                    Some('\'') => '\'',
                    Some('"') => '"',
                    Some('\n') => continue,
                    Some(other) => {
                        let span = lexer.span();
                        lexer.fail(LexError::InvalidEscape {
                            sequence: format!("\\{}", other),
                            span,
                        });
                        return None;
                    }
                    None => {
                        let span = lexer.span();
                        lexer.fail(LexError::UnterminatedString { span });
                        return None;
                    }
                };
                value.push(escaped);
            }
            c => value.push(c),
        }
    }

    Some(lexer.make_token(TokenKind::StringLiteral(value)))
}
