//! Pratt parser implementation
//! Handles expression parsing with binding power

pub mod led;
pub mod nud;
pub mod precedence;

pub use precedence::*;

use crate::frontend::lexer::tokens::*;
use crate::frontend::parser::ast::*;
use crate::frontend::parser::{ParseError, ParserState};

impl ParserState<'_> {
    /// Parse an expression whose operators bind at least as tight as `min_bp`
    pub fn parse_expression(
        &mut self,
        min_bp: u8,
    ) -> Result<Node, ParseError> {
        let mut left = self.parse_prefix()?;

        loop {
            let kind = self.current_kind();

            match kind {
                TokenKind::LParen if BP_CALL >= min_bp => {
                    left = self.parse_call(left)?;
                }
                TokenKind::Dot | TokenKind::LBracket if BP_CALL >= min_bp => {
                    left = self.parse_member(left)?;
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus if BP_POSTFIX >= min_bp => {
                    left = self.parse_postfix_update(left)?;
                }
                TokenKind::Question if BP_CONDITIONAL >= min_bp => {
                    left = self.parse_conditional(left)?;
                }
                ref k if k.is_assign_op() && BP_ASSIGN >= min_bp => {
                    let op = match assign_op(k) {
                        Some(op) => op,
                        None => break,
                    };
                    left = self.parse_assignment(left, op)?;
                }
                ref k => {
                    let op = match binary_op(k) {
                        Some(op) => op,
                        None => break,
                    };
                    let bp = op.precedence();
                    if bp < min_bp {
                        break;
                    }
                    self.bump();
                    // left associative: the right operand binds strictly tighter
                    let right = self.parse_expression(bp + 1)?;
                    let span = left.span.to(right.span);
                    left = Node::new(
                        NodeKind::Binary {
                            op,
                            left: Box::new(left),
                            right: Box::new(right),
                        },
                        span,
                    );
                }
            }
        }

        Ok(left)
    }
}
