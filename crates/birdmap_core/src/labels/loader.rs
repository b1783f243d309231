//! Label registry parser.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::store::LabelStore;
use crate::models::{ExternalId, LabelEntry};

/// Errors that stop the registry from being read at all.
///
/// A missing file is not one of them: it degrades to an empty store with a
/// [`super::LabelWarning::RegistryMissing`] warning.
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("Failed to read label registry {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for label operations.
pub type LabelResult<T> = Result<T, LabelError>;

/// Parse one registry line.
///
/// Returns `None` for blank lines, lines without a space and lines whose
/// remainder has no comma.
///
/// ```
/// use birdmap_core::labels::parse_label_line;
///
/// let entry = parse_label_line("12 Blue Tit, Cyanistes caeruleus").unwrap();
/// assert_eq!(entry.external_id.as_str(), "12");
/// assert_eq!(entry.display_name, "Blue Tit");
/// assert_eq!(entry.secondary_name, "Cyanistes caeruleus");
///
/// assert!(parse_label_line("13 Unnamed").is_none());
/// ```
pub fn parse_label_line(line: &str) -> Option<LabelEntry> {
    let line = line.trim();
    let (id, rest) = line.split_once(' ')?;
    let (display, secondary) = rest.split_once(',')?;

    Some(LabelEntry::new(
        ExternalId::new(id),
        display.trim(),
        secondary.trim(),
    ))
}

/// Parse a whole registry document.
pub fn parse_labels(content: &str) -> LabelStore {
    let mut store = LabelStore::new();

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_label_line(line) {
            Some(entry) => store.insert(entry, index + 1),
            None => store.note_ignored_line(),
        }
    }

    store
}

/// Load the registry from disk.
///
/// A missing file yields an empty store carrying a warning so the problem
/// surfaces as missing labels during validation.
pub fn load_labels(path: &Path) -> LabelResult<LabelStore> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!("Label registry not found: {}", path.display());
            return Ok(LabelStore::missing(path));
        }
        Err(source) => {
            return Err(LabelError::ReadError {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let store = parse_labels(&content);

    for warning in store.warnings() {
        tracing::warn!("{}", warning);
    }
    tracing::debug!(
        "Loaded {} labels from {} ({} lines ignored)",
        store.len(),
        path.display(),
        store.ignored_lines()
    );

    Ok(store)
}
