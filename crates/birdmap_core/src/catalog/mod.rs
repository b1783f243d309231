//! Catalog document.
//!
//! The catalog maps each public code to the names and sequence id of its
//! item and is written once, at the end of a successful run:
//!
//! ```json
//! {
//!   "e34f": {
//!     "common": "Blue Tit",
//!     "scientific": "Cyanistes caeruleus",
//!     "id": "001"
//!   }
//! }
//! ```
//!
//! Keys keep assignment order, indentation is two spaces and non-ASCII
//! characters are written literally.

mod document;
mod writer;

pub use document::{Catalog, CatalogEntry};
pub use writer::{CatalogError, CatalogResult};
