//! Code assignor state machine.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{PublicCode, SequenceId};

/// Errors from code assignment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    /// Every attempt produced a code that was already issued.
    #[error("Code space exhausted for sequence {sequence_id} after {attempts} attempts")]
    SpaceExhausted { sequence_id: u32, attempts: u32 },
}

/// Result type for code operations.
pub type CodeResult<T> = Result<T, CodeError>;

/// Tunables for code derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodePolicy {
    /// Added to the sequence number once a candidate collides.
    pub collision_offset: u32,
    /// Collisions tolerated for one item before giving up.
    pub max_attempts: u32,
    /// Number of trailing hex characters kept from the digest.
    pub code_length: usize,
    /// Zero-padding width of the hashed and published sequence number.
    pub sequence_width: usize,
}

impl Default for CodePolicy {
    fn default() -> Self {
        Self {
            collision_offset: 200,
            max_attempts: 1000,
            code_length: 4,
            sequence_width: 3,
        }
    }
}

/// Last `length` hex characters of the MD5 digest of `input`.
///
/// ```
/// use birdmap_core::codes::derive_code;
///
/// assert_eq!(derive_code("001", 4).as_str(), "e34f");
/// ```
pub fn derive_code(input: &str, length: usize) -> PublicCode {
    let hex = format!("{:x}", md5::compute(input.as_bytes()));
    let start = hex.len().saturating_sub(length);
    PublicCode::new(&hex[start..])
}

/// A code bound to the next sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub code: PublicCode,
    pub sequence_id: SequenceId,
    /// Zero-padded sequence number published as the item's `id`.
    pub sequence_label: String,
    /// The string that was actually hashed to produce `code`.
    pub hashed_input: String,
    /// Collisions hit before `code` was accepted.
    pub collisions: u32,
}

/// Issues collision-free codes for consecutive sequence numbers.
///
/// All mutable state of the assignment (next sequence number and issued
/// codes) lives here and is threaded through the run explicitly.
#[derive(Debug, Clone)]
pub struct CodeAssignor {
    policy: CodePolicy,
    next_sequence: SequenceId,
    issued: HashSet<PublicCode>,
}

impl CodeAssignor {
    pub fn new(policy: CodePolicy) -> Self {
        Self {
            policy,
            next_sequence: SequenceId::FIRST,
            issued: HashSet::new(),
        }
    }

    /// Start with codes that must not be issued again.
    pub fn with_issued(policy: CodePolicy, issued: impl IntoIterator<Item = PublicCode>) -> Self {
        Self {
            issued: issued.into_iter().collect(),
            ..Self::new(policy)
        }
    }

    pub fn policy(&self) -> &CodePolicy {
        &self.policy
    }

    /// Sequence number the next assignment will use.
    pub fn next_sequence(&self) -> SequenceId {
        self.next_sequence
    }

    pub fn issued(&self) -> &HashSet<PublicCode> {
        &self.issued
    }

    /// Assign a code to the next item.
    ///
    /// On success the code is recorded as issued and the sequence number
    /// advances by one. On failure nothing changes.
    pub fn assign(&mut self) -> CodeResult<Assignment> {
        let sequence_id = self.next_sequence;
        let mut offset = 0;
        let mut collisions = 0;

        loop {
            let hashed_input =
                SequenceId::new(sequence_id.value() + offset).padded(self.policy.sequence_width);
            let code = derive_code(&hashed_input, self.policy.code_length);

            if !self.issued.contains(&code) {
                self.issued.insert(code.clone());
                self.next_sequence = sequence_id.next();

                return Ok(Assignment {
                    code,
                    sequence_id,
                    sequence_label: sequence_id.padded(self.policy.sequence_width),
                    hashed_input,
                    collisions,
                });
            }

            collisions += 1;
            tracing::debug!(
                "Collision on code {} for sequence {} (attempt {})",
                code,
                sequence_id,
                collisions
            );
            if collisions >= self.policy.max_attempts {
                return Err(CodeError::SpaceExhausted {
                    sequence_id: sequence_id.value(),
                    attempts: collisions,
                });
            }
            offset = self.policy.collision_offset;
        }
    }
}

impl Default for CodeAssignor {
    fn default() -> Self {
        Self::new(CodePolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_codes_follow_sequence() {
        let mut assignor = CodeAssignor::default();

        let first = assignor.assign().unwrap();
        assert_eq!(first.code.as_str(), "e34f");
        assert_eq!(first.sequence_label, "001");
        assert_eq!(first.collisions, 0);

        let second = assignor.assign().unwrap();
        assert_eq!(second.code.as_str(), "f05a");
        assert_eq!(second.sequence_label, "002");

        assert_eq!(assignor.next_sequence(), SequenceId::new(3));
        assert_eq!(assignor.issued().len(), 2);
    }

    #[test]
    fn collision_jumps_by_fixed_offset() {
        let taken = derive_code("001", 4);
        let mut assignor = CodeAssignor::with_issued(CodePolicy::default(), [taken]);

        let assignment = assignor.assign().unwrap();
        assert_eq!(assignment.code, derive_code("201", 4));
        assert_eq!(assignment.code.as_str(), "5293");
        assert_eq!(assignment.hashed_input, "201");
        assert_eq!(assignment.sequence_label, "001");
        assert_eq!(assignment.collisions, 1);
        assert_eq!(assignor.next_sequence(), SequenceId::new(2));
    }

    #[test]
    fn natural_collision_in_long_run() {
        // Sequences 82 and 98 share the digest suffix 7c95.
        assert_eq!(derive_code("082", 4), derive_code("098", 4));

        let mut assignor = CodeAssignor::default();
        let assignments: Vec<_> = (0..98).map(|_| assignor.assign().unwrap()).collect();

        assert_eq!(assignments[81].code.as_str(), "7c95");
        assert_eq!(assignments[97].code, derive_code("298", 4));
        assert_eq!(assignments[97].sequence_label, "098");

        let unique: HashSet<_> = assignments.iter().map(|a| a.code.clone()).collect();
        assert_eq!(unique.len(), 98);
    }

    #[test]
    fn exhaustion_is_reported_and_leaves_state_untouched() {
        let policy = CodePolicy {
            max_attempts: 3,
            ..CodePolicy::default()
        };
        let taken = [derive_code("001", 4), derive_code("201", 4)];
        let mut assignor = CodeAssignor::with_issued(policy, taken);

        let err = assignor.assign().unwrap_err();
        assert_eq!(
            err,
            CodeError::SpaceExhausted {
                sequence_id: 1,
                attempts: 3
            }
        );
        assert_eq!(assignor.next_sequence(), SequenceId::FIRST);
        assert_eq!(assignor.issued().len(), 2);
    }

    #[test]
    fn sequence_wider_than_padding_is_not_truncated() {
        assert_eq!(SequenceId::new(1000).padded(3), "1000");
        assert_eq!(derive_code("1000", 4).as_str(), "b3c5");
    }
}
