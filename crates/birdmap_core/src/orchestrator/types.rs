//! Core types for the orchestrator pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::codes::Assignment;
use crate::config::Settings;
use crate::generation::AudioExtractor;
use crate::items::CompleteItem;
use crate::labels::LabelStore;
use crate::logging::RunLogger;
use crate::models::{Item, SourceFacet};
use crate::scanning::ScanWarning;

/// Options chosen per invocation rather than per config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop after code assignment; write nothing.
    pub dry_run: bool,
}

/// Read-only context passed to pipeline steps.
///
/// Contains run configuration and shared resources that steps can read
/// but not modify. Mutable state goes in `RunState`.
pub struct RunContext {
    pub settings: Settings,
    /// Run name (log file name and error context).
    pub run_name: String,
    pub logger: Arc<RunLogger>,
    /// Converter used for audio extraction.
    pub extractor: Arc<dyn AudioExtractor>,
    pub options: RunOptions,
}

impl RunContext {
    pub fn new(
        settings: Settings,
        run_name: impl Into<String>,
        logger: Arc<RunLogger>,
        extractor: Arc<dyn AudioExtractor>,
    ) -> Self {
        Self {
            settings,
            run_name: run_name.into(),
            logger,
            extractor,
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn labels_file(&self) -> &Path {
        Path::new(&self.settings.paths.labels_file)
    }

    pub fn videos_dir(&self) -> &Path {
        Path::new(&self.settings.paths.videos_dir)
    }

    pub fn images_dir(&self) -> &Path {
        Path::new(&self.settings.paths.images_dir)
    }

    pub fn catalog_file(&self) -> &Path {
        Path::new(&self.settings.paths.catalog_file)
    }
}

/// An item with the code it will be published under.
#[derive(Debug, Clone)]
pub struct PlannedItem {
    pub item: CompleteItem,
    pub assignment: Assignment,
}

/// Mutable state accumulated as the pipeline runs.
///
/// Each step records its output here for later steps to consume.
#[derive(Debug, Default)]
pub struct RunState {
    /// Label registry (set by LoadLabels).
    pub labels: Option<LabelStore>,
    /// Video facets in scan order (set by ScanSources).
    pub videos: Vec<SourceFacet>,
    /// Image facets in scan order (set by ScanSources).
    pub images: Vec<SourceFacet>,
    /// Entries skipped while scanning.
    pub scan_warnings: Vec<ScanWarning>,
    /// Joined items in first-appearance order (set by JoinItems).
    pub items: Vec<Item>,
    /// Items that passed the completeness gate (set by ValidateItems).
    pub complete_items: Vec<CompleteItem>,
    /// Items with their assigned codes, in processing order (set by AssignCodes).
    pub planned: Vec<PlannedItem>,
    /// Entries of items whose artifacts were all produced.
    pub catalog: Catalog,
    /// Artifact files written so far.
    pub artifacts: Vec<PathBuf>,
    /// Where the catalog was written (set by WriteCatalog).
    pub catalog_path: Option<PathBuf>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings raised by the label loader and the scanners.
    pub fn warning_count(&self) -> usize {
        let label_warnings = self.labels.as_ref().map_or(0, |l| l.warnings().len());
        label_warnings + self.scan_warnings.len()
    }

    /// Summarize a finished run.
    pub fn summary(&self, dry_run: bool) -> RunSummary {
        RunSummary {
            items: self.planned.len(),
            catalog_entries: self.catalog.len(),
            artifacts: self.artifacts.len(),
            warnings: self.warning_count(),
            catalog_path: self.catalog_path.clone(),
            dry_run,
        }
    }
}

/// Counts reported after a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Items that were assigned a code.
    pub items: usize,
    pub catalog_entries: usize,
    pub artifacts: usize,
    pub warnings: usize,
    /// `None` for dry runs.
    pub catalog_path: Option<PathBuf>,
    pub dry_run: bool,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.dry_run {
            return write!(
                f,
                "Dry run: {} item(s) would be published ({} warning(s))",
                self.items, self.warnings
            );
        }
        write!(
            f,
            "Published {} item(s), {} artifact(s)",
            self.catalog_entries, self.artifacts
        )?;
        if let Some(ref path) = self.catalog_path {
            write!(f, " to {}", path.display())?;
        }
        write!(f, " ({} warning(s))", self.warnings)
    }
}
