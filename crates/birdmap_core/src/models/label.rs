//! Label registry entries.

use serde::{Deserialize, Serialize};

use super::ids::ExternalId;

/// Names attached to an external identifier by the label registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub external_id: ExternalId,
    /// Common name (e.g. "Blue Tit").
    pub display_name: String,
    /// Scientific name (e.g. "Cyanistes caeruleus").
    pub secondary_name: String,
}

impl LabelEntry {
    pub fn new(
        external_id: ExternalId,
        display_name: impl Into<String>,
        secondary_name: impl Into<String>,
    ) -> Self {
        Self {
            external_id,
            display_name: display_name.into(),
            secondary_name: secondary_name.into(),
        }
    }
}
