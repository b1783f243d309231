//! Per-item artifact generation.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::compensation::{remove_if_exists, RollbackReport, UndoStack};
use super::errors::ArtifactError;
use super::extractor::AudioExtractor;
use super::producers::{ArtifactProducer, AudioProducer, ImageProducer};
use crate::config::Settings;
use crate::items::CompleteItem;
use crate::models::PublicCode;

/// A file written for an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducedArtifact {
    pub producer: String,
    pub path: PathBuf,
    pub diagnostics: Vec<String>,
}

/// Every artifact written for one item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    pub artifacts: Vec<ProducedArtifact>,
}

impl GeneratedArtifacts {
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.artifacts.iter().map(|a| &a.path)
    }
}

/// One producer that failed for an item.
#[derive(Debug)]
pub struct ProducerFailure {
    pub producer: String,
    pub output: PathBuf,
    pub error: ArtifactError,
}

impl fmt::Display for ProducerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.producer,
            self.output.display(),
            self.error
        )
    }
}

/// Failed generation for an item, after rollback has run.
#[derive(Debug)]
pub struct GenerationFailure {
    pub failures: Vec<ProducerFailure>,
    pub rollback: RollbackReport,
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failures: Vec<String> = self.failures.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", failures.join("; "))?;
        if !self.rollback.is_clean() {
            write!(f, " (cleanup incomplete: {} file(s) left)", self.rollback.failed.len())?;
        }
        Ok(())
    }
}

/// Runs a fixed list of producers per item with rollback on failure.
pub struct ArtifactGenerator {
    producers: Vec<Box<dyn ArtifactProducer>>,
}

impl ArtifactGenerator {
    /// Create a generator with no producers.
    pub fn new() -> Self {
        Self {
            producers: Vec::new(),
        }
    }

    /// Audio extraction followed by image publication, as configured.
    pub fn standard(extractor: Arc<dyn AudioExtractor>, settings: &Settings) -> Self {
        Self::new()
            .with_producer(AudioProducer::new(
                extractor,
                &settings.paths.sounds_output_dir,
                &settings.sources.audio_extension,
            ))
            .with_producer(ImageProducer::new(
                &settings.paths.images_output_dir,
                &settings.sources.published_image_extension,
            ))
    }

    /// Add a producer.
    pub fn add_producer<P: ArtifactProducer + 'static>(&mut self, producer: P) -> &mut Self {
        self.producers.push(Box::new(producer));
        self
    }

    /// Add a producer (builder pattern).
    pub fn with_producer<P: ArtifactProducer + 'static>(mut self, producer: P) -> Self {
        self.add_producer(producer);
        self
    }

    /// Producer names in order.
    pub fn producer_names(&self) -> Vec<&str> {
        self.producers.iter().map(|p| p.name()).collect()
    }

    /// Paths that would be written for `code`.
    pub fn planned_outputs(&self, code: &PublicCode) -> Vec<PathBuf> {
        self.producers.iter().map(|p| p.output_path(code)).collect()
    }

    /// Produce every artifact for `item` under `code`.
    ///
    /// All producers run. If any fails, each output written for this item
    /// is removed (newest first) and the failures are returned; the caller
    /// is expected to stop the run. A failed producer's output path is only
    /// removed if it did not exist before, so a converter refusing to
    /// overwrite leaves the earlier file alone.
    pub fn generate(
        &self,
        item: &CompleteItem,
        code: &PublicCode,
    ) -> Result<GeneratedArtifacts, GenerationFailure> {
        let mut undo = UndoStack::new();
        let mut produced = GeneratedArtifacts::default();
        let mut failures = Vec::new();

        for producer in &self.producers {
            let output = producer.output_path(code);
            let existed = output.exists();
            let result = producer.produce(item, &output);

            if result.is_ok() || !existed {
                let cleanup_path = output.clone();
                undo.push(format!("remove {}", output.display()), move || {
                    remove_if_exists(&cleanup_path).map(|_| ())
                });
            }

            match result {
                Ok(diagnostics) => produced.artifacts.push(ProducedArtifact {
                    producer: producer.name().to_string(),
                    path: output,
                    diagnostics,
                }),
                Err(error) => {
                    tracing::warn!(
                        "{} failed for id '{}' ({}): {}",
                        producer.name(),
                        item.external_id,
                        code,
                        error
                    );
                    failures.push(ProducerFailure {
                        producer: producer.name().to_string(),
                        output,
                        error,
                    });
                }
            }
        }

        if failures.is_empty() {
            undo.commit();
            Ok(produced)
        } else {
            let rollback = undo.unwind();
            Err(GenerationFailure { failures, rollback })
        }
    }
}

impl Default for ArtifactGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{ArtifactResult, ConversionOutput};
    use crate::models::{ExternalId, FacetKind, LabelEntry, SourceFacet};
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    struct FakeExtractor {
        fail: bool,
        partial: bool,
    }

    impl AudioExtractor for FakeExtractor {
        fn name(&self) -> &str {
            "fake"
        }

        fn extract(&self, _video: &Path, output: &Path) -> ArtifactResult<ConversionOutput> {
            if self.fail {
                if self.partial {
                    // Leave a partial file behind like a crashed converter would.
                    fs::write(output, b"partial").unwrap();
                }
                return Err(ArtifactError::command_failed("fake", 1, "boom"));
            }
            fs::write(output, b"mp3").unwrap();
            Ok(ConversionOutput {
                output: output.to_path_buf(),
                diagnostics: vec!["size=1kB".to_string()],
            })
        }
    }

    fn fixture(image_exists: bool) -> (TempDir, CompleteItem) {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sounds")).unwrap();
        fs::create_dir(dir.path().join("images")).unwrap();
        let image = dir.path().join("12.png");
        if image_exists {
            fs::write(&image, b"png").unwrap();
        }

        let id = ExternalId::new("12");
        let item = CompleteItem {
            external_id: id.clone(),
            video: SourceFacet::new(FacetKind::Video, id.clone(), dir.path().join("Clip(12).mp4"), "Clip(12)"),
            image: SourceFacet::new(FacetKind::Image, id.clone(), image, "12"),
            label: LabelEntry::new(id, "Blue Tit", "Cyanistes caeruleus"),
        };
        (dir, item)
    }

    fn generator(dir: &Path, fail_audio: bool) -> ArtifactGenerator {
        ArtifactGenerator::new()
            .with_producer(AudioProducer::new(
                Arc::new(FakeExtractor {
                    fail: fail_audio,
                    partial: fail_audio,
                }),
                dir.join("sounds"),
                "mp3",
            ))
            .with_producer(ImageProducer::new(dir.join("images"), "jpg"))
    }

    #[test]
    fn writes_all_artifacts() {
        let (dir, item) = fixture(true);
        let generator = generator(dir.path(), false);
        assert_eq!(generator.producer_names(), vec!["Audio", "Image"]);

        let produced = generator.generate(&item, &PublicCode::new("e34f")).unwrap();

        assert_eq!(produced.artifacts.len(), 2);
        assert_eq!(produced.artifacts[0].diagnostics, vec!["size=1kB"]);
        assert!(dir.path().join("sounds/e34f.mp3").exists());
        assert!(dir.path().join("images/e34f.jpg").exists());
    }

    #[test]
    fn image_failure_rolls_back_audio() {
        let (dir, item) = fixture(false);
        let failure = generator(dir.path(), false)
            .generate(&item, &PublicCode::new("e34f"))
            .unwrap_err();

        assert_eq!(failure.failures.len(), 1);
        assert_eq!(failure.failures[0].producer, "Image");
        assert!(failure.rollback.is_clean());
        assert!(!dir.path().join("sounds/e34f.mp3").exists());
        assert!(!dir.path().join("images/e34f.jpg").exists());
    }

    #[test]
    fn audio_failure_still_runs_image_then_cleans_both() {
        let (dir, item) = fixture(true);
        let failure = generator(dir.path(), true)
            .generate(&item, &PublicCode::new("e34f"))
            .unwrap_err();

        assert_eq!(failure.failures.len(), 1);
        assert_eq!(failure.failures[0].producer, "Audio");
        assert_eq!(failure.rollback.undone.len(), 2);
        assert!(!dir.path().join("sounds/e34f.mp3").exists());
        assert!(!dir.path().join("images/e34f.jpg").exists());
        assert!(failure.to_string().contains("boom"));
    }

    #[test]
    fn refused_overwrite_keeps_existing_output() {
        let (dir, item) = fixture(true);
        fs::write(dir.path().join("sounds/e34f.mp3"), b"earlier run").unwrap();
        let generator = ArtifactGenerator::new()
            .with_producer(AudioProducer::new(
                Arc::new(FakeExtractor {
                    fail: true,
                    partial: false,
                }),
                dir.path().join("sounds"),
                "mp3",
            ))
            .with_producer(ImageProducer::new(dir.path().join("images"), "jpg"));

        let failure = generator
            .generate(&item, &PublicCode::new("e34f"))
            .unwrap_err();

        assert_eq!(failure.rollback.undone.len(), 1);
        assert_eq!(
            fs::read(dir.path().join("sounds/e34f.mp3")).unwrap(),
            b"earlier run"
        );
        assert!(!dir.path().join("images/e34f.jpg").exists());
    }
}
