//! Configuration management for birdmap.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Validation on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use birdmap_core::config::ConfigManager;
//!
//! // Create manager and load (or create default) config
//! let mut config = ConfigManager::new("birdmap.toml");
//! config.load_or_create().unwrap();
//!
//! // Read settings
//! println!("Videos: {}", config.settings().paths.videos_dir);
//!
//! // Make sure output folders exist before a run
//! config.ensure_output_dirs().unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    CodeSettings, ConverterSettings, LoggingSettings, PathSettings, Settings, SourceSettings,
};
