//! In-memory catalog with insertion-ordered keys.

use std::collections::HashSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::writer::{CatalogError, CatalogResult};
use crate::models::PublicCode;

/// Published metadata for one code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Common name.
    pub common: String,
    /// Scientific name.
    pub scientific: String,
    /// Zero-padded sequence id.
    pub id: String,
}

impl CatalogEntry {
    pub fn new(
        common: impl Into<String>,
        scientific: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            common: common.into(),
            scientific: scientific.into(),
            id: id.into(),
        }
    }
}

/// Append-only code → entry mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<(PublicCode, CatalogEntry)>,
    codes: HashSet<PublicCode>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Codes may appear only once.
    pub fn insert(&mut self, code: PublicCode, entry: CatalogEntry) -> CatalogResult<()> {
        if !self.codes.insert(code.clone()) {
            return Err(CatalogError::DuplicateCode(code));
        }
        self.entries.push((code, entry));
        Ok(())
    }

    pub fn get(&self, code: &PublicCode) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, entry)| entry)
    }

    pub fn contains(&self, code: &PublicCode) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PublicCode, &CatalogEntry)> {
        self.entries.iter().map(|(code, entry)| (code, entry))
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_json_string(&self) -> CatalogResult<String> {
        serde_json::to_string_pretty(self).map_err(CatalogError::Serialize)
    }

    /// Parse a catalog document.
    pub fn from_json_str(content: &str) -> CatalogResult<Self> {
        serde_json::from_str(content).map_err(CatalogError::Parse)
    }
}

impl Serialize for Catalog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, entry) in &self.entries {
            map.serialize_entry(code, entry)?;
        }
        map.end()
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping public codes to catalog entries")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Catalog, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut catalog = Catalog::new();
        while let Some((code, entry)) = access.next_entry::<PublicCode, CatalogEntry>()? {
            catalog
                .insert(code, entry)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(catalog)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CatalogVisitor)
    }
}
