//! Deterministic public code assignment.
//!
//! Each item receives a short code derived from its sequence number:
//!
//! ```text
//! sequence 1 → "001" → md5 → "…e34f" → code "e34f"
//! ```
//!
//! When a candidate was already issued in this run, the hashed number jumps
//! by a fixed offset (200) instead of probing linearly. The jump is fixed for
//! every retry of the same item, so existing catalogs keep their codes.
//! Running out of attempts aborts the run before any artifact is written.

mod assignor;

pub use assignor::{derive_code, Assignment, CodeAssignor, CodeError, CodePolicy, CodeResult};
