//! 代码输出端
//!
//! 生成扩展逐行写出，只追加、不回读。

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Write to {target} failed: {source}")]
    Write {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("Sink is closed")]
    Closed,
}

/// Append-only, newline-terminated text destination
pub trait CodeSink {
    /// Append one line; the sink adds the newline
    fn write_line(
        &mut self,
        line: &str,
    ) -> Result<(), SinkError>;
}

/// File destination, appended to or truncated once when opened
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: File,
}

impl FileSink {
    /// Open `path`, creating it if needed
    pub fn open(
        path: &Path,
        append: bool,
    ) -> Result<Self, SinkError> {
        let mut options = OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        let file = options.open(path).map_err(|source| SinkError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            "Opened sink {} ({})",
            path.display(),
            if append { "append" } else { "truncate" }
        );
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CodeSink for FileSink {
    fn write_line(
        &mut self,
        line: &str,
    ) -> Result<(), SinkError> {
        writeln!(self.file, "{}", line).map_err(|source| SinkError::Write {
            target: self.path.display().to_string(),
            source,
        })
    }
}

/// Any `io::Write`, e.g. stdout
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
    name: String,
}

impl<W: Write> WriterSink<W> {
    pub fn new(
        writer: W,
        name: impl Into<String>,
    ) -> Self {
        Self {
            writer,
            name: name.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CodeSink for WriterSink<W> {
    fn write_line(
        &mut self,
        line: &str,
    ) -> Result<(), SinkError> {
        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .map_err(|source| SinkError::Write {
                target: self.name.clone(),
                source,
            })
    }
}

/// In-memory lines; can be closed to make further writes fail
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Vec<String>,
    closed: bool,
    /// Lines accepted before the sink closes itself
    limit: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that fails after `limit` lines
    pub fn failing_after(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Everything written, newline-terminated
    pub fn text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl CodeSink for MemorySink {
    fn write_line(
        &mut self,
        line: &str,
    ) -> Result<(), SinkError> {
        if self.limit.is_some_and(|limit| self.lines.len() >= limit) {
            self.closed = true;
        }
        if self.closed {
            return Err(SinkError::Closed);
        }
        self.lines.push(line.to_string());
        Ok(())
    }
}
