//! Data models for birdmap.
//!
//! This module contains the core data structures shared by every stage:
//! - Identifiers (external ids, public codes, sequence ids)
//! - Facets (video, image, label) and scanned source files
//! - Label entries and joined items

mod facets;
mod ids;
mod item;
mod label;

pub use facets::{FacetKind, SourceFacet};
pub use ids::{ExternalId, PublicCode, SequenceId};
pub use item::Item;
pub use label::LabelEntry;
