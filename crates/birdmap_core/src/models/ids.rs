//! Identifier newtypes.
//!
//! Keeps external identifiers, derived public codes and sequence numbers
//! from being mixed up with each other or with arbitrary strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key exposed by a source filename or a label line.
///
/// Not guaranteed to be short or URL-safe; it is only ever used as a join key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalId(String);

impl ExternalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExternalId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ExternalId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Short code published in the catalog and used as the artifact file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicCode(String);

impl PublicCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name for an artifact published under this code.
    ///
    /// ```
    /// use birdmap_core::models::PublicCode;
    ///
    /// assert_eq!(PublicCode::new("1f0e").file_name("mp3"), "1f0e.mp3");
    /// ```
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }
}

impl fmt::Display for PublicCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position of an item in the run, starting at 1.
///
/// Published as a zero-padded decimal string (`"001"`, `"002"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SequenceId(u32);

impl SequenceId {
    /// First sequence id issued in a run.
    pub const FIRST: SequenceId = SequenceId(1);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// The following sequence id.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Zero-padded decimal form.
    ///
    /// ```
    /// use birdmap_core::models::SequenceId;
    ///
    /// assert_eq!(SequenceId::new(7).padded(3), "007");
    /// assert_eq!(SequenceId::new(1234).padded(3), "1234");
    /// ```
    pub fn padded(&self, width: usize) -> String {
        format!("{:0width$}", self.0, width = width)
    }
}

impl Default for SequenceId {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_id_serializes_as_plain_string() {
        let id = ExternalId::new("42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
    }

    #[test]
    fn sequence_id_advances() {
        let first = SequenceId::default();
        assert_eq!(first, SequenceId::FIRST);
        assert_eq!(first.next().value(), 2);
        assert_eq!(first.next().padded(3), "002");
    }
}
