//! Error types for the orchestrator pipeline.
//!
//! Errors carry context that chains through layers:
//! Run → Step → Item → Producer

use std::io;

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::codes::CodeError;
use crate::generation::{ArtifactError, GenerationFailure};
use crate::items::CompletenessReport;
use crate::labels::LabelError;
use crate::models::{ExternalId, PublicCode};

/// Top-level pipeline error with run context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A step failed during execution.
    #[error("Run '{run_name}' failed at step '{step_name}': {source}")]
    StepFailed {
        run_name: String,
        step_name: String,
        #[source]
        source: StepError,
    },
}

impl PipelineError {
    pub fn step_failed(
        run_name: impl Into<String>,
        step_name: impl Into<String>,
        source: StepError,
    ) -> Self {
        Self::StepFailed {
            run_name: run_name.into(),
            step_name: step_name.into(),
            source,
        }
    }

    /// The step error behind this failure.
    pub fn step_error(&self) -> &StepError {
        match self {
            Self::StepFailed { source, .. } => source,
        }
    }
}

/// Error from a pipeline step.
#[derive(Error, Debug)]
pub enum StepError {
    /// The label registry exists but could not be read.
    #[error(transparent)]
    Labels(#[from] LabelError),

    /// Neither collection produced a single file.
    #[error("No video or image files found")]
    NoSources,

    /// At least one item lacks a video, an image or a label.
    #[error("{0}")]
    Incomplete(CompletenessReport),

    /// No free code could be found for an item.
    #[error("Could not assign a code to id '{external_id}': {source}")]
    CodeSpaceExhausted {
        external_id: ExternalId,
        #[source]
        source: CodeError,
    },

    /// Producing the artifacts of one item failed; its outputs were removed.
    #[error("Artifact generation failed for id '{external_id}' (code {code}): {failure}")]
    ArtifactsFailed {
        external_id: ExternalId,
        code: PublicCode,
        failure: GenerationFailure,
    },

    /// Generation could not start (e.g. converter not installed).
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// The catalog document could not be written.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    IoError {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// A previous step did not leave the state this step needs.
    #[error("Precondition not met: {0}")]
    PreconditionFailed(String),

    /// Output validation failed.
    #[error("Output validation failed: {0}")]
    InvalidOutput(String),
}

impl StepError {
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::IoError {
            operation: operation.into(),
            source,
        }
    }

    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::PreconditionFailed(message.into())
    }

    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
