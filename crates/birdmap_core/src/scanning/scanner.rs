//! Lazy directory scanner producing source facets.

use std::fmt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::ids::{extract_image_id, extract_video_id};
use crate::models::{ExternalId, FacetKind, SourceFacet};

/// A file or directory entry that was skipped during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWarning {
    /// The entry (or the collection directory itself) could not be read.
    Unreadable {
        path: Option<PathBuf>,
        message: String,
    },
    /// The file name is not valid UTF-8, so no identifier can be derived.
    NonUtf8Name(PathBuf),
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanWarning::Unreadable {
                path: Some(path),
                message,
            } => write!(f, "Skipping unreadable entry {}: {}", path.display(), message),
            ScanWarning::Unreadable {
                path: None,
                message,
            } => write!(f, "Skipping unreadable entry: {}", message),
            ScanWarning::NonUtf8Name(path) => {
                write!(f, "Skipping file with non UTF-8 name: {}", path.display())
            }
        }
    }
}

/// Iterator over the matching files of one collection directory.
///
/// Entries are produced in file-name order from a single directory listing;
/// the scanner cannot be restarted once consumed. Skipped entries are
/// recorded and available from [`SourceScanner::warnings`].
pub struct SourceScanner {
    kind: FacetKind,
    extension: String,
    entries: walkdir::IntoIter,
    warnings: Vec<ScanWarning>,
}

impl SourceScanner {
    /// Scan `dir` for files of the given collection with `extension`.
    ///
    /// The extension is matched case-insensitively, with or without a
    /// leading dot.
    pub fn new(kind: FacetKind, dir: &Path, extension: &str) -> Self {
        let entries = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        Self {
            kind,
            extension: extension.trim_start_matches('.').to_string(),
            entries,
            warnings: Vec::new(),
        }
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Consume the scanner, returning the warnings it recorded.
    pub fn into_warnings(self) -> Vec<ScanWarning> {
        self.warnings
    }

    fn warn(&mut self, warning: ScanWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }

    fn derive_id(&self, stem: &str) -> ExternalId {
        match self.kind {
            FacetKind::Video => extract_video_id(stem),
            _ => extract_image_id(stem),
        }
    }
}

impl Iterator for SourceScanner {
    type Item = SourceFacet;

    fn next(&mut self) -> Option<SourceFacet> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf);
                    self.warn(ScanWarning::Unreadable {
                        path,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let path = entry.path();
            let is_hidden = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with('.'));
            if is_hidden || !self.matches_extension(path) {
                continue;
            }

            match entry.metadata() {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    self.warn(ScanWarning::Unreadable {
                        path: Some(path.to_path_buf()),
                        message: e.to_string(),
                    });
                    continue;
                }
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                self.warn(ScanWarning::NonUtf8Name(path.to_path_buf()));
                continue;
            };

            let external_id = self.derive_id(stem);
            tracing::debug!(
                "Found {} '{}' -> id '{}'",
                self.kind,
                path.display(),
                external_id
            );

            return Some(SourceFacet::new(
                self.kind,
                external_id,
                path.to_path_buf(),
                stem,
            ));
        }
    }
}

/// Scan the video collection.
pub fn scan_videos(dir: &Path, extension: &str) -> SourceScanner {
    SourceScanner::new(FacetKind::Video, dir, extension)
}

/// Scan the image collection.
pub fn scan_images(dir: &Path, extension: &str) -> SourceScanner {
    SourceScanner::new(FacetKind::Image, dir, extension)
}
