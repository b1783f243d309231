//! Completeness validation.
//!
//! The check is all-or-nothing: every violation is collected, and a single
//! one rejects the whole run before any code is assigned or any file is
//! written.

use std::collections::BTreeSet;
use std::fmt;

use crate::models::{ExternalId, FacetKind, Item, LabelEntry, SourceFacet};

/// An item with every required facet present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteItem {
    pub external_id: ExternalId,
    pub video: SourceFacet,
    pub image: SourceFacet,
    pub label: LabelEntry,
}

impl CompleteItem {
    fn from_item(item: Item) -> Result<Self, Item> {
        match item {
            Item {
                external_id,
                video: Some(video),
                image: Some(image),
                label: Some(label),
            } => Ok(Self {
                external_id,
                video,
                image,
                label,
            }),
            incomplete => Err(incomplete),
        }
    }
}

/// Missing facets for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub external_id: ExternalId,
    pub missing: BTreeSet<FacetKind>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing: Vec<String> = self.missing.iter().map(|m| m.to_string()).collect();
        write!(f, "Id {}: missing {}", self.external_id, missing.join(", "))
    }
}

/// Every violation found in one validation pass, in item order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletenessReport {
    violations: Vec<Violation>,
}

impl CompletenessReport {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Missing facets for one identifier, if it has any.
    pub fn missing_for(&self, id: &ExternalId) -> Option<&BTreeSet<FacetKind>> {
        self.violations
            .iter()
            .find(|v| &v.external_id == id)
            .map(|v| &v.missing)
    }
}

impl fmt::Display for CompletenessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} item(s) incomplete", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  {}", violation)?;
        }
        Ok(())
    }
}

/// Validate all items, returning them as complete items or the full report.
pub fn validate_items(items: Vec<Item>) -> Result<Vec<CompleteItem>, CompletenessReport> {
    let mut complete = Vec::with_capacity(items.len());
    let mut report = CompletenessReport::default();

    for item in items {
        match CompleteItem::from_item(item) {
            Ok(item) => complete.push(item),
            Err(item) => report.violations.push(Violation {
                missing: item.missing_facets(),
                external_id: item.external_id,
            }),
        }
    }

    if report.is_empty() {
        Ok(complete)
    } else {
        Err(report)
    }
}
