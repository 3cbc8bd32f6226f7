//! genext configuration
//!
//! Project-level configuration with merge semantics.
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high → low):
//! 1. CLI arguments
//! 2. Explicit config file (--config)
//! 3. Project-level (./genext.toml)
//! 4. Default values
//! ```
//!
//! # Usage
//!
//! ```rust
//! use genext::util::config::GenextConfig;
//!
//! let config = GenextConfig::default();
//! assert_eq!(config.output.path.to_str(), Some("test.js"));
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project config file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "genext.toml";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GenextConfig {
    /// Where the generating extensions are written
    #[serde(default)]
    pub output: OutputConfig,
    /// Shape of the emitted generator text
    #[serde(default)]
    pub emit: EmitConfig,
    /// Specialization switches
    #[serde(default)]
    pub specialize: SpecializeConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Sink target file
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    /// Append to the target instead of truncating it
    #[serde(default = "default_true")]
    pub append: bool,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("test.js")
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            append: true,
        }
    }
}

/// How static parameter values are spliced into printed residual code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// A source literal: strings stay quoted, NaN and the infinities stay numbers
    #[default]
    Json,
    /// `${x}`: the value's plain string form
    Raw,
}

impl std::fmt::Display for Interpolation {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Interpolation::Json => write!(f, "json"),
            Interpolation::Raw => write!(f, "raw"),
        }
    }
}

/// Emitter configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmitConfig {
    /// Print function called by the generator for every residual line
    #[serde(default = "default_print_fn")]
    pub print_fn: String,
    /// Indentation width, in spaces, for both generator and residual nesting
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Placeholder style
    #[serde(default)]
    pub interpolation: Interpolation,
    /// Suffix of the generator's name
    #[serde(default = "default_gen_suffix")]
    pub gen_suffix: String,
    /// Suffix of the specialized function's name
    #[serde(default = "default_special_suffix")]
    pub special_suffix: String,
}

fn default_print_fn() -> String {
    "console.log".to_string()
}

fn default_indent() -> usize {
    4
}

fn default_gen_suffix() -> String {
    "_gen".to_string()
}

fn default_special_suffix() -> String {
    "_special".to_string()
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            print_fn: default_print_fn(),
            indent: default_indent(),
            interpolation: Interpolation::default(),
            gen_suffix: default_gen_suffix(),
            special_suffix: default_special_suffix(),
        }
    }
}

/// Specializer configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpecializeConfig {
    /// Decide static `if` tests at generation time
    #[serde(default = "default_true")]
    pub eliminate_static_branches: bool,
}

impl Default for SpecializeConfig {
    fn default() -> Self {
        Self {
            eliminate_static_branches: true,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl GenextConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit config if given, else `./genext.toml` if present,
    /// else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let project = Path::new(PROJECT_CONFIG_FILE);
        if project.exists() {
            tracing::debug!("Loading project config {}", project.display());
            return Self::load(project);
        }

        Ok(Self::default())
    }
}
