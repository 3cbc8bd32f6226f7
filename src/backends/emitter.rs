//! 生成扩展输出
//!
//! 把一个函数的两级语句流写成 JavaScript 生成器：
//!
//! ```text
//! function f_gen (x) {
//!     console.log(`function f_special (y) {`);
//!     console.log(`    return ${Object.is(x, -0) ? "-0" : typeof x === "number" ? String(x) : JSON.stringify(x)} + y ;`);
//!     console.log(`}`);
//! }
//! ```
//!
//! `emit` 边特化边写出；`build` + `GeneratingExtension::render` 先在内存里
//! 建好整个生成扩展再写出。两条路径共用同一个 `GenWriter`，输出逐字相同。

use super::sink::{CodeSink, SinkError};
use crate::frontend::parser::ast::Function;
use crate::middle::bta::{analyze_function, BindingContext, StaticParams};
use crate::middle::error::SpecializeResult;
use crate::middle::specialize::{expression_source, statement_source, GenStmt, Piece, Specializer, Template};
use crate::util::config::{EmitConfig, GenextConfig, Interpolation};
use tracing::{debug, info};

/// Generator-level depth of the residual print statements
const GEN_BODY_DEPTH: usize = 1;

/// A generating extension held in memory
#[derive(Debug, Clone)]
pub struct GeneratingExtension {
    name: String,
    static_params: StaticParams,
    dynamic_params: Vec<String>,
    body: Vec<GenStmt>,
    ctx: BindingContext,
    emit: EmitConfig,
}

impl GeneratingExtension {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn static_params(&self) -> &StaticParams {
        &self.static_params
    }

    pub fn dynamic_params(&self) -> &[String] {
        &self.dynamic_params
    }

    /// Two-level body, prologue included
    pub fn body(&self) -> &[GenStmt] {
        &self.body
    }

    pub fn context(&self) -> &BindingContext {
        &self.ctx
    }

    pub fn emit_config(&self) -> &EmitConfig {
        &self.emit
    }

    /// Name of the generator procedure, e.g. `f_gen`
    pub fn generator_name(&self) -> String {
        format!("{}{}", self.name, self.emit.gen_suffix)
    }

    /// Name of the specialized procedure, e.g. `f_special`
    pub fn special_name(&self) -> String {
        format!("{}{}", self.name, self.emit.special_suffix)
    }

    /// Header line the generator prints first
    pub fn special_header(&self) -> String {
        special_header(&self.name, &self.dynamic_params, &self.emit)
    }

    /// Write the generator text to `sink`
    pub fn render(
        &self,
        sink: &mut dyn CodeSink,
    ) -> SpecializeResult<()> {
        let mut writer = GenWriter::new(sink, &self.emit);
        writer.header(&self.name, &self.static_params, &self.dynamic_params)?;
        writer.stmts(&self.body, GEN_BODY_DEPTH)?;
        writer.footer()?;
        Ok(())
    }
}

/// Analyze and specialize `func`, then write its generator as it goes
///
/// Analysis rejects every unsupported node up front, so nothing is written
/// for a function that fails.
pub fn emit(
    func: &Function,
    static_params: &StaticParams,
    config: &GenextConfig,
    sink: &mut dyn CodeSink,
) -> SpecializeResult<()> {
    let ctx = analyze_function(func, static_params, &config.specialize)?;
    let specializer = Specializer::new(&ctx, config.emit.indent);
    let dynamic_params = dynamic_params(func, static_params);

    let mut writer = GenWriter::new(sink, &config.emit);
    writer.header(&func.name, static_params, &dynamic_params)?;
    writer.stmts(&specializer.prologue(), GEN_BODY_DEPTH)?;
    for stmt in &func.body {
        let gen = specializer.specialize_stmt(stmt)?;
        writer.stmts(&gen, GEN_BODY_DEPTH)?;
    }
    writer.footer()?;

    info!(
        "Emitted {}{} ({} line(s))",
        func.name, config.emit.gen_suffix, writer.lines
    );
    Ok(())
}

/// Analyze and specialize `func` into an in-memory generating extension
pub fn build(
    func: &Function,
    static_params: &StaticParams,
    config: &GenextConfig,
) -> SpecializeResult<GeneratingExtension> {
    let ctx = analyze_function(func, static_params, &config.specialize)?;
    let body = Specializer::new(&ctx, config.emit.indent).specialize_body(&func.body)?;
    debug!(
        "Built generating extension for {} ({} top-level statement(s))",
        func.name,
        body.len()
    );
    Ok(GeneratingExtension {
        name: func.name.clone(),
        static_params: static_params.clone(),
        dynamic_params: dynamic_params(func, static_params),
        body,
        ctx,
        emit: config.emit.clone(),
    })
}

fn dynamic_params(
    func: &Function,
    static_params: &StaticParams,
) -> Vec<String> {
    static_params
        .remaining(&func.params)
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn special_header(
    name: &str,
    dynamic_params: &[String],
    config: &EmitConfig,
) -> String {
    format!(
        "function {}{} ({}) {{",
        name,
        config.special_suffix,
        dynamic_params.join(", ")
    )
}

/// Template text as the inside of a JS template literal
pub fn render_template(
    template: &Template,
    interpolation: Interpolation,
) -> String {
    let mut out = String::new();
    for piece in template.pieces() {
        match piece {
            Piece::Text(text) => escape_template_text(text, &mut out),
            Piece::Hole(name) | Piece::Lift(name) => match interpolation {
                Interpolation::Json => out.push_str(&format!("${{{}}}", literal_expression(name))),
                Interpolation::Raw => out.push_str(&format!("${{{}}}", name)),
            },
        }
    }
    out
}

/// JS expression printing `name`'s value as a source literal
///
/// `JSON.stringify` turns NaN and the infinities into `null` and drops the
/// sign of -0, so numbers go through `String` instead.
pub fn literal_expression(name: &str) -> String {
    format!(
        "Object.is({n}, -0) ? \"-0\" : typeof {n} === \"number\" ? String({n}) : JSON.stringify({n})",
        n = name
    )
}

/// Escape `` ` ``, `\` and `${`
fn escape_template_text(
    text: &str,
    out: &mut String,
) {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '`' => out.push_str("\\`"),
            '\\' => out.push_str("\\\\"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            _ => out.push(c),
        }
    }
}

/// Writes generator lines to a sink
struct GenWriter<'s> {
    sink: &'s mut dyn CodeSink,
    config: &'s EmitConfig,
    lines: usize,
}

impl<'s> GenWriter<'s> {
    fn new(
        sink: &'s mut dyn CodeSink,
        config: &'s EmitConfig,
    ) -> Self {
        Self {
            sink,
            config,
            lines: 0,
        }
    }

    fn line(
        &mut self,
        depth: usize,
        text: &str,
    ) -> Result<(), SinkError> {
        let line = format!("{}{}", " ".repeat(self.config.indent * depth), text);
        self.sink.write_line(&line)?;
        self.lines += 1;
        Ok(())
    }

    /// Print statement for one residual line
    fn print(
        &mut self,
        depth: usize,
        residual: &str,
    ) -> Result<(), SinkError> {
        let text = format!("{}(`{}`);", self.config.print_fn, residual);
        self.line(depth, &text)
    }

    fn header(
        &mut self,
        name: &str,
        static_params: &StaticParams,
        dynamic_params: &[String],
    ) -> Result<(), SinkError> {
        self.line(
            0,
            &format!(
                "function {}{} ({}) {{",
                name, self.config.gen_suffix, static_params
            ),
        )?;
        let special = special_header(name, dynamic_params, self.config);
        let mut escaped = String::new();
        escape_template_text(&special, &mut escaped);
        self.print(GEN_BODY_DEPTH, &escaped)
    }

    fn footer(&mut self) -> Result<(), SinkError> {
        self.print(GEN_BODY_DEPTH, "}")?;
        self.line(0, "}")
    }

    fn stmts(
        &mut self,
        stmts: &[GenStmt],
        depth: usize,
    ) -> SpecializeResult<()> {
        for stmt in stmts {
            self.stmt(stmt, depth)?;
        }
        Ok(())
    }

    fn stmt(
        &mut self,
        stmt: &GenStmt,
        depth: usize,
    ) -> SpecializeResult<()> {
        match stmt {
            GenStmt::Emit(template) => {
                let residual = render_template(template, self.config.interpolation);
                self.print(depth, &residual)?;
            }
            GenStmt::Bind(node) => {
                let source = statement_source(node)?;
                self.line(depth, &source)?;
            }
            GenStmt::Branch {
                test,
                then_branch,
                else_branch,
            } => {
                let test = expression_source(test)?;
                self.line(depth, &format!("if ({}) {{", test))?;
                self.stmts(then_branch, depth + 1)?;
                if !else_branch.is_empty() {
                    self.line(depth, "} else {")?;
                    self.stmts(else_branch, depth + 1)?;
                }
                self.line(depth, "}")?;
            }
        }
        Ok(())
    }
}
