//! Joined per-identifier record.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::facets::{FacetKind, SourceFacet};
use super::ids::ExternalId;
use super::label::LabelEntry;

/// One external identifier with whatever facets were found for it.
///
/// After validation every item that proceeds to generation has all three
/// facets present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub external_id: ExternalId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<SourceFacet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<SourceFacet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelEntry>,
}

impl Item {
    /// Create an item with no facets attached yet.
    pub fn new(external_id: ExternalId) -> Self {
        Self {
            external_id,
            video: None,
            image: None,
            label: None,
        }
    }

    /// Facets that are still absent.
    pub fn missing_facets(&self) -> BTreeSet<FacetKind> {
        FacetKind::REQUIRED
            .into_iter()
            .filter(|kind| !self.has(*kind))
            .collect()
    }

    /// Whether the given facet is present.
    pub fn has(&self, kind: FacetKind) -> bool {
        match kind {
            FacetKind::Video => self.video.is_some(),
            FacetKind::Image => self.image.is_some(),
            FacetKind::Label => self.label.is_some(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_facets().is_empty()
    }
}
