//! Label registry loading.
//!
//! The registry is a flat UTF-8 text file with one record per line:
//!
//! ```text
//! 12 Blue Tit, Cyanistes caeruleus
//! 13 Great Tit, Parus major
//! ```
//!
//! The first space separates the external identifier from the names; the
//! first comma separates the common name from the scientific name. Lines
//! without a comma carry no label and are ignored.

mod loader;
mod store;

pub use loader::{load_labels, parse_label_line, parse_labels, LabelError, LabelResult};
pub use store::{LabelStore, LabelWarning};
