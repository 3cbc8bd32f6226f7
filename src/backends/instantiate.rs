//! 生成扩展实例化
//!
//! 不经过 JavaScript 运行时，直接在 Rust 里执行两级语句流：绑定静态实参，
//! 运行生成期语句，选择生成期分支，并把残差行填好占位符收集起来。得到的
//! 文本与生成器在 JS 中打印的内容一致。

use super::emitter::GeneratingExtension;
use crate::middle::const_eval::{ConstEvalEnv, ConstEvaluator, Value};
use crate::middle::error::EvalError;
use crate::middle::specialize::GenStmt;
use crate::util::config::Interpolation;
use crate::util::span::Span;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

/// `--bind` parse errors
#[derive(Debug, Error)]
pub enum StaticArgError {
    #[error("Expected NAME=JSON, found `{0}`")]
    MissingEquals(String),

    #[error("Static argument `{name}` is not valid JSON: {source}")]
    InvalidJson {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Static argument values by parameter name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticArgs {
    values: IndexMap<String, serde_json::Value>,
}

impl StaticArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing an earlier one
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: serde_json::Value,
    ) {
        self.values.insert(name.into(), value);
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<&serde_json::Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse `NAME=JSON`, e.g. `x=3` or `s="abc"`
    pub fn parse_binding(binding: &str) -> Result<(String, serde_json::Value), StaticArgError> {
        let (name, json) = binding
            .split_once('=')
            .ok_or_else(|| StaticArgError::MissingEquals(binding.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(StaticArgError::MissingEquals(binding.to_string()));
        }
        let value = serde_json::from_str(json).map_err(|source| StaticArgError::InvalidJson {
            name: name.to_string(),
            source,
        })?;
        Ok((name.to_string(), value))
    }

    /// Parse a list of `NAME=JSON` bindings; later ones win
    pub fn parse_bindings<I, S>(bindings: I) -> Result<Self, StaticArgError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = Self::new();
        for binding in bindings {
            let (name, value) = Self::parse_binding(binding.as_ref())?;
            args.insert(name, value);
        }
        Ok(args)
    }
}

impl<S: Into<String>> FromIterator<(S, serde_json::Value)> for StaticArgs {
    fn from_iter<I: IntoIterator<Item = (S, serde_json::Value)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}

impl GeneratingExtension {
    /// Run the generator for `args` and return the specialized function text
    pub fn instantiate(
        &self,
        args: &StaticArgs,
    ) -> Result<String, EvalError> {
        // `var` is hoisted in the generator: read before its declaration it is undefined
        let mut env = ConstEvalEnv::new();
        for name in self.body().iter().flat_map(|stmt| stmt.hoisted_vars()) {
            env.bind(name, Value::Undefined);
        }
        for name in self.static_params().iter() {
            let json = args
                .get(name)
                .ok_or_else(|| EvalError::MissingStaticArgument {
                    name: name.to_string(),
                })?;
            env.bind(name, Value::from_json(name, json)?);
        }

        let mut run = Instantiation {
            evaluator: ConstEvaluator::with_env(env),
            interpolation: self.emit_config().interpolation,
            lines: vec![self.special_header()],
        };
        run.stmts(self.body())?;
        run.lines.push("}".to_string());
        debug!(
            "Instantiated {} ({} line(s))",
            self.special_name(),
            run.lines.len()
        );

        let mut text = run.lines.join("\n");
        text.push('\n');
        Ok(text)
    }
}

struct Instantiation {
    evaluator: ConstEvaluator,
    interpolation: Interpolation,
    lines: Vec<String>,
}

impl Instantiation {
    fn stmts(
        &mut self,
        stmts: &[GenStmt],
    ) -> Result<(), EvalError> {
        for stmt in stmts {
            match stmt {
                GenStmt::Emit(template) => {
                    let env = self.evaluator.env();
                    let interpolation = self.interpolation;
                    let line = template.fill(|name| {
                        let value = env.get(name).ok_or_else(|| EvalError::UnboundVariable {
                            name: name.to_string(),
                            span: Span::dummy(),
                        })?;
                        Ok::<_, EvalError>(match interpolation {
                            Interpolation::Json => value.to_literal_text(),
                            Interpolation::Raw => value.to_string(),
                        })
                    })?;
                    self.lines.push(line);
                }
                GenStmt::Bind(node) => self.evaluator.execute(node)?,
                GenStmt::Branch {
                    test,
                    then_branch,
                    else_branch,
                } => {
                    if self.evaluator.evaluate(test)?.to_boolean() {
                        self.stmts(then_branch)?;
                    } else {
                        self.stmts(else_branch)?;
                    }
                }
            }
        }
        Ok(())
    }
}
