//! Source collection scanning.
//!
//! Enumerates the video and image collections and derives each file's
//! external identifier from its name:
//!
//! - **Video**: the text between the last `(` and the last `)` of the stem,
//!   or the whole stem when it has no parentheses
//!   (`"Chant à déterminer (bar) (42).mp4"` → `42`).
//! - **Image**: the stem verbatim (`"42.png"` → `42`).
//!
//! Files that cannot be inspected are skipped with a [`ScanWarning`]; they
//! never abort the scan.

mod ids;
mod scanner;

pub use ids::{extract_image_id, extract_video_id};
pub use scanner::{scan_images, scan_videos, ScanWarning, SourceScanner};
