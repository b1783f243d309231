//! Facet kinds and scanned source files.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ids::ExternalId;

/// One required input kind for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetKind {
    Video,
    Image,
    Label,
}

impl FacetKind {
    /// All facets an item needs before it can be published.
    pub const REQUIRED: [FacetKind; 3] = [FacetKind::Video, FacetKind::Image, FacetKind::Label];
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetKind::Video => write!(f, "video"),
            FacetKind::Image => write!(f, "image"),
            FacetKind::Label => write!(f, "label"),
        }
    }
}

/// A file found in one of the source collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFacet {
    /// Which collection the file came from (video or image).
    pub kind: FacetKind,
    /// Identifier derived from the file name.
    pub external_id: ExternalId,
    /// Full path of the file.
    pub path: PathBuf,
    /// File stem as found on disk.
    pub original_filename: String,
}

impl SourceFacet {
    pub fn new(
        kind: FacetKind,
        external_id: ExternalId,
        path: impl Into<PathBuf>,
        original_filename: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            external_id,
            path: path.into(),
            original_filename: original_filename.into(),
        }
    }
}
