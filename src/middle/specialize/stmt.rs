//! Statement specialization
//!
//! Each statement turns into residual lines plus, where the generator has
//! to keep track of static state, generation-time statements.

use super::expr::expression_source;
use super::{GenStmt, Piece, Specializer, Template};
use crate::frontend::parser::ast::{AssignOp, DeclKind, Node, NodeKind};
use crate::middle::error::{SpecializeError, SpecializeResult};

/// Depth of the specialized function's body
const BODY_DEPTH: usize = 1;

impl Specializer<'_> {
    /// Specialize one top-level statement of the function body
    pub fn specialize_stmt(
        &self,
        node: &Node,
    ) -> SpecializeResult<Vec<GenStmt>> {
        let mut out = Vec::new();
        self.stmt_into(node, BODY_DEPTH, &mut out)?;
        Ok(out)
    }

    /// Declarations of lifted static parameters, which open the body
    pub fn prologue(&self) -> Vec<GenStmt> {
        self.context()
            .lifted_params()
            .into_iter()
            .map(|name| {
                let mut line = Template::text(format!(
                    "{}var {} = ",
                    self.indentation(BODY_DEPTH),
                    name
                ));
                line.push_piece(Piece::Lift(name.to_string()));
                line.push_str(" ;");
                GenStmt::Emit(line)
            })
            .collect()
    }

    /// Prologue followed by every statement of `body`
    pub fn specialize_body(
        &self,
        body: &[Node],
    ) -> SpecializeResult<Vec<GenStmt>> {
        let mut out = self.prologue();
        for stmt in body {
            self.stmt_into(stmt, BODY_DEPTH, &mut out)?;
        }
        Ok(out)
    }

    fn stmt_into(
        &self,
        node: &Node,
        depth: usize,
        out: &mut Vec<GenStmt>,
    ) -> SpecializeResult<()> {
        match &node.kind {
            // a nested block keeps its braces so `let`/`const` stay scoped
            NodeKind::Block(stmts) => {
                out.push(GenStmt::Emit(self.line_start(depth, "{")));
                for stmt in stmts {
                    self.stmt_into(stmt, depth + 1, out)?;
                }
                out.push(GenStmt::Emit(self.line_start(depth, "}")));
            }
            NodeKind::VarDeclList { kind, declarations } => {
                for decl in declarations {
                    self.declarator(*kind, decl, depth, out)?;
                }
            }
            NodeKind::VarDecl { .. } => self.declarator(DeclKind::Var, node, depth, out)?,
            NodeKind::ExpressionStatement(expr) => self.effect(node, expr, depth, out)?,
            NodeKind::Return(argument) => {
                let mut line = self.line_start(depth, "return");
                if let Some(argument) = argument {
                    line.push_str(" ");
                    line.append(self.specialize_expr(argument)?.into_template());
                }
                line.push_str(" ;");
                out.push(GenStmt::Emit(line));
            }
            NodeKind::If {
                test,
                consequent,
                alternate,
            } => {
                if self.context().is_reducible(test) {
                    let mut then_branch = Vec::new();
                    self.branch_into(consequent, depth, &mut then_branch)?;
                    let mut else_branch = Vec::new();
                    if let Some(alternate) = alternate {
                        self.branch_into(alternate, depth, &mut else_branch)?;
                    }
                    out.push(GenStmt::Branch {
                        test: (**test).clone(),
                        then_branch,
                        else_branch,
                    });
                } else {
                    let mut line = self.line_start(depth, "if (");
                    line.append(self.specialize_expr(test)?.into_template());
                    line.push_str(") {");
                    out.push(GenStmt::Emit(line));

                    self.branch_into(consequent, depth + 1, out)?;
                    if let Some(alternate) = alternate {
                        out.push(GenStmt::Emit(self.line_start(depth, "} else {")));
                        self.branch_into(alternate, depth + 1, out)?;
                    }
                    out.push(GenStmt::Emit(self.line_start(depth, "}")));
                }
            }
            // the loop header is not reproduced
            NodeKind::For { body, .. } => self.stmt_into(body, depth, out)?,
            _ => return Err(self.unsupported(node)),
        }
        Ok(())
    }

    /// Body of an `if` arm; the braces come from the `if` itself, or vanish
    /// with a decided test
    fn branch_into(
        &self,
        node: &Node,
        depth: usize,
        out: &mut Vec<GenStmt>,
    ) -> SpecializeResult<()> {
        match &node.kind {
            NodeKind::Block(stmts) => {
                for stmt in stmts {
                    self.stmt_into(stmt, depth, out)?;
                }
                Ok(())
            }
            _ => self.stmt_into(node, depth, out),
        }
    }

    fn declarator(
        &self,
        kind: DeclKind,
        decl: &Node,
        depth: usize,
        out: &mut Vec<GenStmt>,
    ) -> SpecializeResult<()> {
        let NodeKind::VarDecl { name, init } = &decl.kind else {
            return Err(self.unsupported(decl));
        };
        let ctx = self.context();

        if ctx.is_hole(name) {
            // a static parameter only changes inside the generator
            if let Some(init) = init {
                let assign = NodeKind::Assignment {
                    target: Box::new(Node::new(NodeKind::Identifier(name.clone()), decl.span)),
                    op: AssignOp::Assign,
                    value: init.clone(),
                };
                out.push(GenStmt::Bind(Node::new(
                    NodeKind::ExpressionStatement(Box::new(Node::new(assign, decl.span))),
                    decl.span,
                )));
            }
            return Ok(());
        }

        let mut line = self.line_start(depth, &format!("{} {}", kind.as_str(), name));
        if let Some(init) = init {
            line.push_str(" = ");
            line.append(self.specialize_expr(init)?.into_template());
        }
        line.push_str(" ;");
        out.push(GenStmt::Emit(line));

        if ctx.is_mirrored(name) {
            out.push(GenStmt::Bind(Node::new(
                NodeKind::VarDeclList {
                    kind,
                    declarations: vec![decl.clone()],
                },
                decl.span,
            )));
        }
        Ok(())
    }

    /// Assignment or update statement
    fn effect(
        &self,
        stmt: &Node,
        expr: &Node,
        depth: usize,
        out: &mut Vec<GenStmt>,
    ) -> SpecializeResult<()> {
        let (target, line) = match &expr.kind {
            NodeKind::Assignment { target, op, value } => {
                let name = target.as_identifier().ok_or_else(|| self.unsupported(target))?;
                let mut line = self.line_start(depth, &format!("{} {} ", name, op));
                line.append(self.specialize_expr(value)?.into_template());
                (name, line)
            }
            NodeKind::Update { argument, .. } => {
                let name = argument
                    .as_identifier()
                    .ok_or_else(|| self.unsupported(argument))?;
                let mut line = self.line_start(depth, "");
                line.append(self.specialize_expr(expr)?.into_template());
                (name, line)
            }
            _ => return Err(self.unsupported(expr)),
        };

        let ctx = self.context();
        if ctx.is_hole(target) {
            out.push(GenStmt::Bind(stmt.clone()));
            return Ok(());
        }
        out.push(GenStmt::Emit(line));
        if ctx.is_mirrored(target) {
            out.push(GenStmt::Bind(stmt.clone()));
        }
        Ok(())
    }

    fn line_start(
        &self,
        depth: usize,
        text: &str,
    ) -> Template {
        Template::text(format!("{}{}", self.indentation(depth), text))
    }
}

/// Print a generation-time statement as generator source
pub fn statement_source(node: &Node) -> SpecializeResult<String> {
    match &node.kind {
        NodeKind::VarDeclList { kind, declarations } => {
            let mut parts = Vec::with_capacity(declarations.len());
            for decl in declarations {
                let NodeKind::VarDecl { name, init } = &decl.kind else {
                    return Err(unsupported(decl));
                };
                match init {
                    Some(init) => parts.push(format!("{} = {}", name, expression_source(init)?)),
                    None => parts.push(name.clone()),
                }
            }
            Ok(format!("{} {};", kind.as_str(), parts.join(", ")))
        }
        NodeKind::ExpressionStatement(expr) => match &expr.kind {
            NodeKind::Assignment { target, op, value } => {
                let name = target.as_identifier().ok_or_else(|| unsupported(target))?;
                Ok(format!("{} {} {};", name, op, expression_source(value)?))
            }
            _ => Ok(format!("{};", expression_source(expr)?)),
        },
        _ => Err(unsupported(node)),
    }
}

fn unsupported(node: &Node) -> SpecializeError {
    SpecializeError::UnsupportedNodeKind {
        kind: node.kind.name(),
        function: None,
        span: node.span,
    }
}
