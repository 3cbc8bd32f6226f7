//! Specialization errors

use crate::backends::sink::SinkError;
use crate::util::span::Span;
use thiserror::Error;

/// Specialization result
pub type SpecializeResult<T> = Result<T, SpecializeError>;

/// Errors raised while analyzing or specializing one function
#[derive(Debug, Error)]
pub enum SpecializeError {
    /// A node outside the supported subset; aborts the enclosing function only
    #[error("Unsupported node kind `{kind}`{} at {span}", in_function(.function))]
    UnsupportedNodeKind {
        kind: &'static str,
        function: Option<String>,
        span: Span,
    },

    /// A flagged name with no matching function declaration
    #[error("Function `{name}` is flagged for specialization but not declared")]
    FunctionNotFound { name: String },

    /// The sink rejected a write; fatal for the whole run
    #[error("Sink write failure: {0}")]
    SinkWriteFailure(#[from] SinkError),
}

impl SpecializeError {
    /// Whether the driver may continue with the next function
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SpecializeError::SinkWriteFailure(_))
    }
}

fn in_function(function: &Option<String>) -> String {
    match function {
        Some(name) => format!(" in function `{}`", name),
        None => String::new(),
    }
}

/// Generation-time evaluation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Unbound variable `{name}` at {span}")]
    UnboundVariable { name: String, span: Span },

    #[error("Cannot evaluate `{kind}` at generation time ({span})")]
    UnsupportedNode { kind: &'static str, span: Span },

    #[error("Static argument `{name}` must be a string, number, boolean or null, found {found}")]
    InvalidStaticValue { name: String, found: &'static str },

    #[error("Invalid assignment target at {span}")]
    InvalidAssignmentTarget { span: Span },

    #[error("Missing static argument `{name}`")]
    MissingStaticArgument { name: String },

    #[error("Expression nesting too deep: {depth} (max {max_depth})")]
    RecursionTooDeep { depth: usize, max_depth: usize },
}
