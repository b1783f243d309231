//! Error types for artifact generation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single artifact production step.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// The external converter could not be located.
    #[error("Required tool '{tool}' not found")]
    ToolMissing { tool: String },

    /// The external converter could not be started.
    #[error("Failed to run {tool}: {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The external converter exited unsuccessfully.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
        /// Everything the tool wrote to stderr.
        diagnostics: Vec<String>,
    },

    /// An input facet file is gone.
    #[error("Source file not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// The step reported success but left no usable file behind.
    #[error("Output file missing or empty: {}", .0.display())]
    OutputMissing(PathBuf),

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl ArtifactError {
    /// Create an I/O error with context.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a command failed error.
    pub fn command_failed(
        tool: impl Into<String>,
        exit_code: i32,
        message: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            tool: tool.into(),
            exit_code,
            message: message.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Attach the converter's output to a command failure.
    pub fn with_diagnostics(mut self, lines: Vec<String>) -> Self {
        if let Self::CommandFailed {
            ref mut diagnostics,
            ..
        } = self
        {
            *diagnostics = lines;
        }
        self
    }

    /// Converter output captured with the failure, if any.
    pub fn diagnostics(&self) -> &[String] {
        match self {
            Self::CommandFailed { diagnostics, .. } => diagnostics.as_slice(),
            _ => &[],
        }
    }
}

/// Result type for artifact operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;
