//! Joining and validation of per-identifier items.
//!
//! Scanned facets and labels are merged into [`Item`](crate::models::Item)
//! records keyed by external identifier, then validated as a whole:
//!
//! ```text
//! videos ─┐
//! images ─┼─► ItemJoiner ─► Vec<Item> ─► validate_items ─► Vec<CompleteItem>
//! labels ─┘                                   │
//!                                             └─► CompletenessReport (abort)
//! ```
//!
//! Item order is first appearance across the video scan followed by the
//! image scan. It feeds sequence-number assignment, so it must be stable.

mod joiner;
mod validator;

pub use joiner::{join_items, ItemJoiner};
pub use validator::{validate_items, CompleteItem, CompletenessReport, Violation};
