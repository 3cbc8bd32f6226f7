//! Precedence handling for the Pratt parser
//!
//! Binary operators use `BinOp::precedence()` directly as their binding
//! power, so the constants here sit around that range.

use crate::frontend::lexer::tokens::TokenKind;
use crate::frontend::parser::ast::{AssignOp, BinOp};

/// Binding power levels for Pratt parser
pub const BP_LOWEST: u8 = 0;
pub const BP_ASSIGN: u8 = 2;
pub const BP_CONDITIONAL: u8 = 3;
pub const BP_UNARY: u8 = 15;
pub const BP_POSTFIX: u8 = 16;
pub const BP_CALL: u8 = 18;

/// Map an infix token to its binary operator
pub fn binary_op(kind: &TokenKind) -> Option<BinOp> {
    let op = match kind {
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        TokenKind::Percent => BinOp::Mod,
        TokenKind::EqEq => BinOp::Eq,
        TokenKind::Neq => BinOp::Ne,
        TokenKind::EqEqEq => BinOp::StrictEq,
        TokenKind::NeqEq => BinOp::StrictNe,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::Le => BinOp::Le,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::Ge => BinOp::Ge,
        TokenKind::Shl => BinOp::Shl,
        TokenKind::Shr => BinOp::Shr,
        TokenKind::UShr => BinOp::UShr,
        TokenKind::Amp => BinOp::BitAnd,
        TokenKind::Pipe => BinOp::BitOr,
        TokenKind::Caret => BinOp::BitXor,
        TokenKind::And => BinOp::And,
        TokenKind::Or => BinOp::Or,
        _ => return None,
    };
    Some(op)
}

/// Map an assignment token to its operator
pub fn assign_op(kind: &TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Mod,
        TokenKind::ShlEq => AssignOp::Shl,
        TokenKind::ShrEq => AssignOp::Shr,
        TokenKind::UShrEq => AssignOp::UShr,
        TokenKind::AmpEq => AssignOp::BitAnd,
        TokenKind::PipeEq => AssignOp::BitOr,
        TokenKind::CaretEq => AssignOp::BitXor,
        _ => return None,
    };
    Some(op)
}
