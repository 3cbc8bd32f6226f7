//! 批处理驱动
//!
//! 按标记顺序逐个处理候选函数。单个函数失败（不支持的语法、找不到声明）
//! 只跳过该函数；输出端写入失败则终止整个运行。

use crate::backends::emitter::{build, emit, GeneratingExtension};
use crate::backends::sink::CodeSink;
use crate::frontend::discovery::{discover, Candidate};
use crate::frontend::parser::ast::{Function, Program};
use crate::middle::error::{SpecializeError, SpecializeResult};
use crate::util::config::GenextConfig;
use tracing::{debug, info, warn};

/// A candidate the driver gave up on
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub name: String,
    pub reason: String,
}

/// Outcome of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverReport {
    /// Number of flagged functions found
    pub candidates: usize,
    /// Emitted functions, in order
    pub emitted: Vec<String>,
    pub skipped: Vec<Skipped>,
}

impl DriverReport {
    pub fn has_candidates(&self) -> bool {
        self.candidates > 0
    }
}

/// Runs discovery and emission over one program
#[derive(Debug, Clone, Default)]
pub struct Driver {
    config: GenextConfig,
}

impl Driver {
    pub fn new(config: GenextConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenextConfig {
        &self.config
    }

    /// Emit a generating extension for every flagged function of `program`
    pub fn run(
        &self,
        program: &Program,
        sink: &mut dyn CodeSink,
    ) -> SpecializeResult<DriverReport> {
        let candidates = discover(program);
        debug!("Found {} candidate function(s)", candidates.len());

        let mut report = DriverReport {
            candidates: candidates.len(),
            ..DriverReport::default()
        };
        for candidate in &candidates {
            let result = resolve(program, candidate)
                .and_then(|func| emit(func, &candidate.static_params, &self.config, &mut *sink));
            match result {
                Ok(()) => report.emitted.push(candidate.name.clone()),
                Err(err) => self.skip(&mut report, candidate, err)?,
            }
        }

        info!(
            "{} emitted, {} skipped",
            report.emitted.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Build every flagged function in memory; failures are skipped
    pub fn build_all(
        &self,
        program: &Program,
    ) -> SpecializeResult<(Vec<GeneratingExtension>, DriverReport)> {
        let candidates = discover(program);
        let mut report = DriverReport {
            candidates: candidates.len(),
            ..DriverReport::default()
        };
        let mut extensions = Vec::new();
        for candidate in &candidates {
            match resolve(program, candidate)
                .and_then(|func| build(func, &candidate.static_params, &self.config))
            {
                Ok(ext) => {
                    report.emitted.push(candidate.name.clone());
                    extensions.push(ext);
                }
                Err(err) => self.skip(&mut report, candidate, err)?,
            }
        }
        Ok((extensions, report))
    }

    /// Record a recoverable failure, hand back a fatal one
    fn skip(
        &self,
        report: &mut DriverReport,
        candidate: &Candidate,
        err: SpecializeError,
    ) -> SpecializeResult<()> {
        if !err.is_recoverable() {
            return Err(err);
        }
        warn!("Skipping `{}`: {}", candidate.name, err);
        report.skipped.push(Skipped {
            name: candidate.name.clone(),
            reason: err.to_string(),
        });
        Ok(())
    }
}

fn resolve<'p>(
    program: &'p Program,
    candidate: &Candidate,
) -> SpecializeResult<&'p Function> {
    let func = program
        .find_function(&candidate.name)
        .ok_or_else(|| SpecializeError::FunctionNotFound {
            name: candidate.name.clone(),
        })?;
    for name in candidate.static_params.iter() {
        if !func.params.iter().any(|p| p == name) {
            warn!(
                "`{}` is listed in {}.staticVars but is not a parameter",
                name, func.name
            );
        }
    }
    Ok(func)
}
