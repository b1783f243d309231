//! Pipeline step implementations.
//!
//! Each step handles one phase of the catalog pipeline.

mod assign_codes;
mod generate_artifacts;
mod join_items;
mod load_labels;
mod scan_sources;
mod validate_items;
mod write_catalog;

pub use assign_codes::AssignCodesStep;
pub use generate_artifacts::GenerateArtifactsStep;
pub use join_items::JoinItemsStep;
pub use load_labels::LoadLabelsStep;
pub use scan_sources::ScanSourcesStep;
pub use validate_items::ValidateItemsStep;
pub use write_catalog::WriteCatalogStep;
