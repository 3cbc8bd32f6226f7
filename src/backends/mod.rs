//! Output layer
//!
//! Turns specialized functions into generating-extension text and writes it
//! to a sink.
//!
//! # Architecture
//!
//! ```text
//! Function + StaticParams
//!         |
//!         v
//!     emitter ──────────▶ CodeSink (file / stdout / memory)
//!         |
//!         v
//! GeneratingExtension ──instantiate──▶ specialized source
//! ```

pub mod emitter;
pub mod instantiate;
pub mod sink;

pub use emitter::{build, emit, render_template, GeneratingExtension};
pub use instantiate::{StaticArgError, StaticArgs};
pub use sink::{CodeSink, FileSink, MemorySink, SinkError, WriterSink};
