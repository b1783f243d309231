//! Artifact producers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use filetime::FileTime;

use super::errors::{ArtifactError, ArtifactResult};
use super::extractor::AudioExtractor;
use crate::items::CompleteItem;
use crate::models::PublicCode;

/// One production step run for every item.
pub trait ArtifactProducer: Send + Sync {
    /// Step name (for logging and failure reports).
    fn name(&self) -> &str;

    /// Where the artifact for `code` is written.
    fn output_path(&self, code: &PublicCode) -> PathBuf;

    /// Write the artifact for `item` to `output`.
    ///
    /// Returns diagnostic lines emitted while producing it.
    fn produce(&self, item: &CompleteItem, output: &Path) -> ArtifactResult<Vec<String>>;
}

/// Extracts the item's audio track into the sounds directory.
pub struct AudioProducer {
    extractor: Arc<dyn AudioExtractor>,
    output_dir: PathBuf,
    extension: String,
}

impl AudioProducer {
    pub fn new(
        extractor: Arc<dyn AudioExtractor>,
        output_dir: impl Into<PathBuf>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            extractor,
            output_dir: output_dir.into(),
            extension: extension.into(),
        }
    }
}

impl ArtifactProducer for AudioProducer {
    fn name(&self) -> &str {
        "Audio"
    }

    fn output_path(&self, code: &PublicCode) -> PathBuf {
        self.output_dir.join(code.file_name(&self.extension))
    }

    fn produce(&self, item: &CompleteItem, output: &Path) -> ArtifactResult<Vec<String>> {
        let converted = self.extractor.extract(&item.video.path, output)?;
        Ok(converted.diagnostics)
    }
}

/// Copies the item's normalized image into the published images directory.
///
/// The bytes are copied as-is and the access/modification times of the
/// source are carried over.
pub struct ImageProducer {
    output_dir: PathBuf,
    extension: String,
}

impl ImageProducer {
    pub fn new(output_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            extension: extension.into(),
        }
    }
}

impl ArtifactProducer for ImageProducer {
    fn name(&self) -> &str {
        "Image"
    }

    fn output_path(&self, code: &PublicCode) -> PathBuf {
        self.output_dir.join(code.file_name(&self.extension))
    }

    fn produce(&self, item: &CompleteItem, output: &Path) -> ArtifactResult<Vec<String>> {
        let source = &item.image.path;
        let meta = fs::metadata(source).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::SourceMissing(source.clone())
            } else {
                ArtifactError::io(format!("reading {}", source.display()), e)
            }
        })?;

        fs::copy(source, output).map_err(|e| {
            ArtifactError::io(
                format!("copying {} to {}", source.display(), output.display()),
                e,
            )
        })?;

        let atime = FileTime::from_last_access_time(&meta);
        let mtime = FileTime::from_last_modification_time(&meta);
        filetime::set_file_times(output, atime, mtime).map_err(|e| {
            ArtifactError::io(format!("setting times on {}", output.display()), e)
        })?;

        tracing::info!("Copied {} to {}", source.display(), output.display());
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExternalId, FacetKind, LabelEntry, SourceFacet};
    use tempfile::tempdir;

    fn item_with_image(path: &Path) -> CompleteItem {
        let id = ExternalId::new("12");
        CompleteItem {
            external_id: id.clone(),
            video: SourceFacet::new(FacetKind::Video, id.clone(), "Clip(12).mp4", "Clip(12)"),
            image: SourceFacet::new(FacetKind::Image, id.clone(), path, "12"),
            label: LabelEntry::new(id, "Blue Tit", "Cyanistes caeruleus"),
        }
    }

    #[test]
    fn image_copy_preserves_bytes_and_mtime() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("12.png");
        fs::write(&source, b"not really a png").unwrap();
        let old = FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(&source, old).unwrap();

        let producer = ImageProducer::new(dir.path().join("out"), "jpg");
        fs::create_dir(dir.path().join("out")).unwrap();
        let output = producer.output_path(&PublicCode::new("e34f"));
        assert!(output.ends_with("out/e34f.jpg"));

        producer.produce(&item_with_image(&source), &output).unwrap();

        assert_eq!(fs::read(&output).unwrap(), b"not really a png");
        let meta = fs::metadata(&output).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta), old);
    }

    #[test]
    fn image_copy_reports_missing_source() {
        let dir = tempdir().unwrap();
        let producer = ImageProducer::new(dir.path(), "jpg");
        let err = producer
            .produce(
                &item_with_image(&dir.path().join("gone.png")),
                &dir.path().join("e34f.jpg"),
            )
            .unwrap_err();
        assert!(matches!(err, ArtifactError::SourceMissing(_)));
    }
}
