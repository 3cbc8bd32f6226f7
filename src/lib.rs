//! genext
//!
//! An offline partial evaluator for a small JavaScript subset. For every
//! function flagged with `f.specialize = true` it emits a *generating
//! extension* `f_gen(statics)`, a JavaScript function that prints the
//! specialized `f_special(dynamics)` once the static values are known.
//!
//! # Example
//!
//! ```rust
//! use genext::{specialize_source, GenextConfig, MemorySink};
//!
//! let source = r#"
//!     function f(x, y) { return x + y; }
//!     f.specialize = true;
//!     f.staticVars = ['x'];
//! "#;
//! let mut sink = MemorySink::new();
//! let report = specialize_source(source, &GenextConfig::default(), &mut sink).unwrap();
//! assert_eq!(report.emitted, vec!["f"]);
//! assert!(sink.text().starts_with("function f_gen (x) {"));
//! ```

#![warn(rust_2018_idioms)]

// Public modules
pub mod backends;
pub mod driver;
pub mod frontend;
pub mod middle;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use backends::{
    CodeSink, FileSink, GeneratingExtension, MemorySink, SinkError, StaticArgs, WriterSink,
};
pub use driver::{Driver, DriverReport, Skipped};
pub use middle::{BindingContext, BindingTime, EvalError, SpecializeError, StaticParams};
pub use util::config::GenextConfig;

use std::fs;
use std::path::Path;
use tracing::debug;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tool name
pub const NAME: &str = "genext";

/// Parse `source` and emit every flagged function into `sink`
pub fn specialize_source(
    source: &str,
    config: &GenextConfig,
    sink: &mut dyn CodeSink,
) -> Result<DriverReport> {
    let program = frontend::parse_program(source)?;
    let report = Driver::new(config.clone()).run(&program, sink)?;
    Ok(report)
}

/// Read a subject file and emit every flagged function into `sink`
///
/// Fails when the file holds no flagged function at all.
pub fn specialize_file(
    path: &Path,
    config: &GenextConfig,
    sink: &mut dyn CodeSink,
) -> Result<DriverReport> {
    debug!("Specializing {}", path.display());
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let report = specialize_source(&source, config, sink)
        .with_context(|| format!("Failed to specialize: {}", path.display()))?;
    if !report.has_candidates() {
        anyhow::bail!(
            "No function in {} is flagged with `.specialize = true`",
            path.display()
        );
    }
    Ok(report)
}

/// Build the generating extensions of a subject file and run each one
/// against `args`, returning `(name, specialized source)` pairs
pub fn instantiate_file(
    path: &Path,
    config: &GenextConfig,
    args: &StaticArgs,
) -> Result<Vec<(String, String)>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let program = frontend::parse_program(&source)?;
    let (extensions, _) = Driver::new(config.clone()).build_all(&program)?;

    let mut out = Vec::with_capacity(extensions.len());
    for ext in &extensions {
        let text = ext
            .instantiate(args)
            .with_context(|| format!("Failed to instantiate {}", ext.generator_name()))?;
        out.push((ext.name().to_string(), text));
    }
    Ok(out)
}
