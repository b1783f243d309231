//! Catalog persistence.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::document::Catalog;
use crate::models::PublicCode;

/// Errors from building, writing or reading a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Code '{0}' is already in the catalog")]
    DuplicateCode(PublicCode),

    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to write catalog {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read catalog {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

impl Catalog {
    /// Write the catalog to `path` atomically.
    ///
    /// Writes to a temp file next to the target, then renames.
    pub fn save(&self, path: &Path) -> CatalogResult<()> {
        let json = self.to_json_string()?;
        atomic_write(path, &json).map_err(|source| CatalogError::WriteError {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Wrote catalog with {} entries to {}", self.len(), path.display());
        Ok(())
    }

    /// Read a catalog written by [`Catalog::save`].
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}

fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("json.tmp");
    let result = fs::File::create(&temp_path)
        .and_then(|mut file| {
            file.write_all(content.as_bytes())?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&temp_path, path));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use tempfile::tempdir;

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .insert(
                PublicCode::new("e34f"),
                CatalogEntry::new("Blue Tit", "Cyanistes caeruleus", "001"),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("birdmap.json");

        sample().save(&path).unwrap();

        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(Catalog::load(&path).unwrap(), sample());
    }

    #[test]
    fn save_into_unwritable_location_fails() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes the rename fail.
        let path = dir.path().join("birdmap.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        let err = sample().save(&path).unwrap_err();
        assert!(matches!(err, CatalogError::WriteError { .. }));
        assert!(!path.with_extension("json.tmp").exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let err = Catalog::load(&dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err, CatalogError::ReadError { .. }));
    }
}
