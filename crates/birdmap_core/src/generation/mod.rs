//! Artifact generation with per-item rollback.
//!
//! For every complete item the generator runs each [`ArtifactProducer`]
//! against the item's public code:
//!
//! - **Audio**: the video facet is converted by an [`AudioExtractor`]
//!   (ffmpeg by default) into `{code}.mp3`.
//! - **Image**: the normalized image facet is copied, with its timestamps,
//!   to `{code}.jpg`.
//!
//! Every producer runs even if an earlier one failed, so all failures are
//! recorded. Each producer registers an undo action on an [`UndoStack`];
//! when any producer fails the stack unwinds in reverse order and removes
//! every file written for that item before the failure is returned.

mod compensation;
mod errors;
mod extractor;
mod generator;
mod producers;

pub use compensation::{remove_if_exists, RollbackReport, UndoStack};
pub use errors::{ArtifactError, ArtifactResult};
pub use extractor::{find_in_path, AudioExtractor, ConversionOutput, FfmpegExtractor};
pub use generator::{
    ArtifactGenerator, GeneratedArtifacts, GenerationFailure, ProducedArtifact, ProducerFailure,
};
pub use producers::{ArtifactProducer, AudioProducer, ImageProducer};
