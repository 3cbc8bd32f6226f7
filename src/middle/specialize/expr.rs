//! Expression specialization
//!
//! Purely syntactic: a static parameter becomes a placeholder, everything
//! else is printed back as written. Nothing is folded.

use super::{Residual, Specializer, Template};
use crate::frontend::parser::ast::{Node, NodeKind, UnaryOp};
use crate::middle::error::{SpecializeError, SpecializeResult};

// precedence levels above the binary operators (`BinOp::precedence`)
const PREC_CONDITIONAL: u8 = 3;
const PREC_PREFIX: u8 = 14;
const PREC_POSTFIX: u8 = 15;
const PREC_PRIMARY: u8 = 20;

impl Specializer<'_> {
    /// Specialize one expression against the binding context
    pub fn specialize_expr(
        &self,
        node: &Node,
    ) -> SpecializeResult<Residual> {
        if let NodeKind::Literal(literal) = &node.kind {
            return Ok(Residual::Const(literal.clone()));
        }
        let ctx = self.context();
        let writer = ExprWriter {
            is_hole: &|name: &str| ctx.is_hole(name),
            function: ctx.function(),
        };
        writer.write(node).map(Residual::Code)
    }
}

/// Print an expression as plain source, static parameters by name
///
/// This is how the generator itself refers to an expression.
pub fn expression_source(node: &Node) -> SpecializeResult<String> {
    let writer = ExprWriter {
        is_hole: &|_: &str| false,
        function: None,
    };
    writer.write(node).map(|template| template.to_string())
}

struct ExprWriter<'p> {
    is_hole: &'p dyn Fn(&str) -> bool,
    function: Option<&'p str>,
}

impl ExprWriter<'_> {
    fn write(
        &self,
        node: &Node,
    ) -> SpecializeResult<Template> {
        match &node.kind {
            NodeKind::Literal(literal) => Ok(Template::text(literal.raw())),
            NodeKind::Identifier(name) => {
                if (self.is_hole)(name) {
                    Ok(Template::hole(name.clone()))
                } else {
                    Ok(Template::text(name.clone()))
                }
            }
            NodeKind::Binary { op, left, right } => {
                let prec = op.precedence();
                let mut out = self.operand(left, prec)?;
                out.push_str(&format!(" {} ", op));
                // equal precedence on the right keeps the source grouping
                out.append(self.operand(right, prec + 1)?);
                Ok(out)
            }
            NodeKind::Unary { op, argument } => {
                let operand = self.operand(argument, PREC_PREFIX)?;
                let mut out = Template::text(op.as_str());
                let spaced = match op {
                    _ if op.is_keyword() => true,
                    UnaryOp::Neg => operand.may_start_with('-'),
                    UnaryOp::Plus => operand.may_start_with('+'),
                    _ => false,
                };
                if spaced {
                    out.push_str(" ");
                }
                out.append(operand);
                Ok(out)
            }
            NodeKind::Update {
                op,
                argument,
                prefix,
            } => {
                let operand = self.operand(argument, PREC_POSTFIX)?;
                if *prefix {
                    let mut out = Template::text(op.as_str());
                    out.append(operand);
                    Ok(out)
                } else {
                    let mut out = operand;
                    out.push_str(op.as_str());
                    Ok(out)
                }
            }
            NodeKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                let mut out = self.operand(test, PREC_CONDITIONAL + 1)?;
                out.push_str(" ? ");
                out.append(self.operand(consequent, PREC_CONDITIONAL)?);
                out.push_str(" : ");
                out.append(self.operand(alternate, PREC_CONDITIONAL)?);
                Ok(out)
            }
            _ => Err(SpecializeError::UnsupportedNodeKind {
                kind: node.kind.name(),
                function: self.function.map(str::to_string),
                span: node.span,
            }),
        }
    }

    /// Write `node`, parenthesized when it binds looser than `min`
    fn operand(
        &self,
        node: &Node,
        min: u8,
    ) -> SpecializeResult<Template> {
        let inner = self.write(node)?;
        if precedence(node) < min {
            Ok(inner.parenthesized())
        } else {
            Ok(inner)
        }
    }
}

fn precedence(node: &Node) -> u8 {
    match &node.kind {
        NodeKind::Binary { op, .. } => op.precedence(),
        NodeKind::Unary { .. } => PREC_PREFIX,
        NodeKind::Update { prefix: true, .. } => PREC_PREFIX,
        NodeKind::Update { prefix: false, .. } => PREC_POSTFIX,
        NodeKind::Conditional { .. } => PREC_CONDITIONAL,
        NodeKind::Assignment { .. } => PREC_CONDITIONAL - 1,
        _ => PREC_PRIMARY,
    }
}
