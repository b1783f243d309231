//! birdmap core - backend logic for the bird catalog generator.
//!
//! This crate joins three independently maintained collections (video clips,
//! cropped images and a label registry) into a validated catalog, assigns
//! every item a short deterministic public code and publishes per-item
//! artifacts under that code. It has no presentation dependencies and can be
//! driven by the `birdmap` binary or directly from tests.

pub mod catalog;
pub mod codes;
pub mod config;
pub mod generation;
pub mod items;
pub mod labels;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod scanning;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
