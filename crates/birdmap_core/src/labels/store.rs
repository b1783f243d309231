//! In-memory label mapping.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::models::{ExternalId, LabelEntry};

/// Something worth reporting that did not stop labels from loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelWarning {
    /// The registry file does not exist; every item will miss its label.
    RegistryMissing(PathBuf),
    /// An identifier appeared again; the later line replaced the earlier one.
    DuplicateId {
        external_id: ExternalId,
        line: usize,
        replaced: String,
    },
}

impl fmt::Display for LabelWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelWarning::RegistryMissing(path) => {
                write!(f, "Label registry not found: {}", path.display())
            }
            LabelWarning::DuplicateId {
                external_id,
                line,
                replaced,
            } => write!(
                f,
                "Duplicate label id '{}' on line {} replaces '{}'",
                external_id, line, replaced
            ),
        }
    }
}

/// Immutable-after-load mapping of external id to label.
#[derive(Debug, Clone, Default)]
pub struct LabelStore {
    entries: HashMap<ExternalId, LabelEntry>,
    warnings: Vec<LabelWarning>,
    ignored_lines: usize,
}

impl LabelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store for a registry that could not be found.
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self {
            warnings: vec![LabelWarning::RegistryMissing(path.into())],
            ..Self::default()
        }
    }

    /// Insert an entry; a later duplicate overwrites the earlier one.
    pub(crate) fn insert(&mut self, entry: LabelEntry, line: usize) {
        let id = entry.external_id.clone();
        if let Some(previous) = self.entries.insert(id.clone(), entry) {
            self.warnings.push(LabelWarning::DuplicateId {
                external_id: id,
                line,
                replaced: previous.display_name,
            });
        }
    }

    pub(crate) fn note_ignored_line(&mut self) {
        self.ignored_lines += 1;
    }

    pub fn get(&self, id: &ExternalId) -> Option<&LabelEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &ExternalId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn warnings(&self) -> &[LabelWarning] {
        &self.warnings
    }

    /// Number of non-empty lines that carried no label.
    pub fn ignored_lines(&self) -> usize {
        self.ignored_lines
    }
}
