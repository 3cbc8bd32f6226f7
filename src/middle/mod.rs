//! Binding-time analysis and specialization
//!
//! This module handles the transformation from a function body to the
//! two-level statement stream a generating extension is printed from.

pub mod bta;
pub mod const_eval;
pub mod error;
pub mod specialize;

pub use bta::{analyze, analyze_function, BindingContext, BindingTime, StaticParams};
pub use error::{EvalError, SpecializeError, SpecializeResult};
pub use specialize::{GenStmt, Piece, Residual, Specializer, Template};
