//! 特化器
//!
//! 依据绑定时间上下文，把表达式变成残差片段、把语句变成两级语句流
//! （`GenStmt`）：打印一行残差代码、在生成期执行一条静态语句，或在生成期
//! 选择一个分支。

pub mod expr;
pub mod stmt;

pub use expr::expression_source;
pub use stmt::statement_source;

use crate::frontend::parser::ast::{DeclKind, Literal, Node, NodeKind};
use crate::middle::bta::BindingContext;
use crate::middle::error::SpecializeError;
use std::fmt;

/// One piece of a residual line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// Verbatim residual text
    Text(String),
    /// Generation-time value of a static parameter
    Hole(String),
    /// Initial value of a static parameter the residual program reassigns
    Lift(String),
}

/// Residual text with placeholders
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(s: impl Into<String>) -> Self {
        let mut template = Self::new();
        template.push_str(&s.into());
        template
    }

    pub fn hole(name: impl Into<String>) -> Self {
        Self {
            pieces: vec![Piece::Hole(name.into())],
        }
    }

    /// Append text, merging with a trailing text piece
    pub fn push_str(
        &mut self,
        s: &str,
    ) {
        if s.is_empty() {
            return;
        }
        match self.pieces.last_mut() {
            Some(Piece::Text(last)) => last.push_str(s),
            _ => self.pieces.push(Piece::Text(s.to_string())),
        }
    }

    pub fn push_piece(
        &mut self,
        piece: Piece,
    ) {
        match piece {
            Piece::Text(s) => self.push_str(&s),
            other => self.pieces.push(other),
        }
    }

    pub fn append(
        &mut self,
        other: Template,
    ) {
        for piece in other.pieces {
            self.push_piece(piece);
        }
    }

    /// `(` + self + `)`
    pub fn parenthesized(self) -> Template {
        let mut out = Template::text("(");
        out.append(self);
        out.push_str(")");
        out
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Names read through `Hole` pieces
    pub fn holes(&self) -> impl Iterator<Item = &str> {
        self.pieces.iter().filter_map(|p| match p {
            Piece::Hole(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Whether the rendered text may begin with a sign character `sign`
    pub(crate) fn may_start_with(
        &self,
        sign: char,
    ) -> bool {
        match self.pieces.first() {
            Some(Piece::Text(s)) => s.starts_with(sign),
            Some(Piece::Hole(_)) | Some(Piece::Lift(_)) => true,
            None => false,
        }
    }

    /// Substitute placeholder values
    pub fn fill<E>(
        &self,
        mut value_of: impl FnMut(&str) -> Result<String, E>,
    ) -> Result<String, E> {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Text(s) => out.push_str(s),
                Piece::Hole(name) | Piece::Lift(name) => out.push_str(&value_of(name)?),
            }
        }
        Ok(out)
    }
}

impl fmt::Display for Template {
    /// Placeholders print as `${name}`
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for piece in &self.pieces {
            match piece {
                Piece::Text(s) => f.write_str(s)?,
                Piece::Hole(name) | Piece::Lift(name) => write!(f, "${{{}}}", name)?,
            }
        }
        Ok(())
    }
}

/// Specialization result for one expression
#[derive(Debug, Clone, PartialEq)]
pub enum Residual {
    /// A literal, printed as written
    Const(Literal),
    /// Residual code
    Code(Template),
}

impl Residual {
    pub fn into_template(self) -> Template {
        match self {
            Residual::Const(literal) => Template::text(literal.raw()),
            Residual::Code(template) => template,
        }
    }
}

/// One statement of the two-level program
#[derive(Debug, Clone, PartialEq)]
pub enum GenStmt {
    /// Print one residual line
    Emit(Template),
    /// Run a static statement while generating
    Bind(Node),
    /// Pick a branch while generating
    Branch {
        test: Node,
        then_branch: Vec<GenStmt>,
        else_branch: Vec<GenStmt>,
    },
}

impl GenStmt {
    /// Every `Emit` template under this statement, depth first
    pub fn templates(&self) -> Vec<&Template> {
        let mut out = Vec::new();
        self.collect_templates(&mut out);
        out
    }

    /// Names declared by generation-time `var` statements under this one
    pub fn hoisted_vars(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_hoisted(&mut out);
        out
    }

    fn collect_hoisted<'s>(
        &'s self,
        out: &mut Vec<&'s str>,
    ) {
        match self {
            GenStmt::Emit(_) => {}
            GenStmt::Bind(node) => {
                if let NodeKind::VarDeclList {
                    kind: DeclKind::Var,
                    declarations,
                } = &node.kind
                {
                    for decl in declarations {
                        if let NodeKind::VarDecl { name, .. } = &decl.kind {
                            out.push(name.as_str());
                        }
                    }
                }
            }
            GenStmt::Branch {
                then_branch,
                else_branch,
                ..
            } => {
                for stmt in then_branch.iter().chain(else_branch) {
                    stmt.collect_hoisted(out);
                }
            }
        }
    }

    fn collect_templates<'s>(
        &'s self,
        out: &mut Vec<&'s Template>,
    ) {
        match self {
            GenStmt::Emit(template) => out.push(template),
            GenStmt::Bind(_) => {}
            GenStmt::Branch {
                then_branch,
                else_branch,
                ..
            } => {
                for stmt in then_branch.iter().chain(else_branch) {
                    stmt.collect_templates(out);
                }
            }
        }
    }
}

/// Expression and statement specializer over a finished analysis
pub struct Specializer<'a> {
    ctx: &'a BindingContext,
    indent: usize,
}

impl<'a> Specializer<'a> {
    /// `indent` is the residual nesting width in spaces
    pub fn new(
        ctx: &'a BindingContext,
        indent: usize,
    ) -> Self {
        Self { ctx, indent }
    }

    pub fn context(&self) -> &'a BindingContext {
        self.ctx
    }

    fn unsupported(
        &self,
        node: &Node,
    ) -> SpecializeError {
        SpecializeError::UnsupportedNodeKind {
            kind: node.kind.name(),
            function: self.ctx.function().map(str::to_string),
            span: node.span,
        }
    }

    fn indentation(
        &self,
        depth: usize,
    ) -> String {
        " ".repeat(self.indent * depth)
    }
}
