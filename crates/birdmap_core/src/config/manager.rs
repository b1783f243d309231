//! Config manager for loading and saving settings atomically.
//!
//! Key features:
//! - Atomic writes (write to temp file, then rename)
//! - Validation on load (unknown sections are dropped on rewrite)
//! - Creation of the configured output folders

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::DocumentMut;

use super::settings::Settings;

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Failed to parse config for editing: {0}")]
    EditParseError(#[from] toml_edit::TomlError),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level tables understood by [`Settings`].
const VALID_SECTIONS: [&str; 5] = ["paths", "sources", "converter", "codes", "logging"];

/// Manages application configuration.
pub struct ConfigManager {
    /// Path to the config file.
    config_path: PathBuf,
    /// Current settings loaded in memory.
    settings: Settings,
}

impl ConfigManager {
    /// Create a new config manager with the given config file path.
    ///
    /// Does not load the config - call `load()` or `load_or_create()` after.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Get a reference to the current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a mutable reference to the current settings.
    ///
    /// Changes are only in memory until `save()` is called.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Take the loaded settings.
    pub fn into_settings(self) -> Settings {
        self.settings
    }

    /// Load config from file.
    ///
    /// Returns error if file doesn't exist.
    pub fn load(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }

        let content = fs::read_to_string(&self.config_path)?;
        self.settings = toml::from_str(&content)?;
        Ok(())
    }

    /// Load config from file, creating with defaults if it doesn't exist.
    ///
    /// Also validates and cleans up the config, saving if changes were made.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)?;
            let (settings, was_modified) = parse_validate_and_clean(&content)?;
            self.settings = settings;

            if was_modified {
                tracing::debug!(
                    "Rewriting {} with defaults filled in",
                    self.config_path.display()
                );
                self.save()?;
            }
        } else {
            self.settings = Settings::default();
            self.save()?;
            tracing::info!("Created default config at {}", self.config_path.display());
        }
        Ok(())
    }

    /// Ensure the output folders and the logs folder exist.
    pub fn ensure_output_dirs(&self) -> ConfigResult<()> {
        let paths = &self.settings.paths;
        let dirs = [
            &paths.sounds_output_dir,
            &paths.images_output_dir,
            &paths.logs_folder,
        ];

        for dir in dirs {
            fs::create_dir_all(dir)?;
        }

        Ok(())
    }

    /// Save the entire config atomically.
    pub fn save(&self) -> ConfigResult<()> {
        let content = self.generate_config_with_comments()?;
        self.atomic_write(&content)?;
        Ok(())
    }

    /// Generate config content with a comment above each section.
    fn generate_config_with_comments(&self) -> ConfigResult<String> {
        let mut output = String::new();

        output.push_str("# birdmap configuration\n");
        output.push_str("# Relative paths are resolved from the working directory.\n\n");

        let sections = [
            (
                "Input collections and output locations",
                "paths",
                toml::to_string_pretty(&self.settings.paths)?,
            ),
            (
                "File extensions (without the dot)",
                "sources",
                toml::to_string_pretty(&self.settings.sources)?,
            ),
            (
                "External audio converter",
                "converter",
                toml::to_string_pretty(&self.settings.converter)?,
            ),
            (
                "Public code derivation",
                "codes",
                toml::to_string_pretty(&self.settings.codes)?,
            ),
            (
                "Logging configuration",
                "logging",
                toml::to_string_pretty(&self.settings.logging)?,
            ),
        ];

        for (comment, table, body) in sections {
            output.push_str(&format!("# {}\n[{}]\n", comment, table));
            for line in body.lines() {
                output.push_str(line);
                output.push('\n');
            }
            output.push('\n');
        }

        Ok(output)
    }

    /// Write content to config file atomically.
    fn atomic_write(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.config_path.with_extension("toml.tmp");

        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }
}

/// Parse, validate, and clean up config content.
///
/// Returns the settings and whether the file needs rewriting (unknown
/// sections present or defaults missing).
fn parse_validate_and_clean(content: &str) -> ConfigResult<(Settings, bool)> {
    let doc: DocumentMut = content.parse()?;
    let settings: Settings = toml::from_str(content)?;

    let has_unknown = doc.iter().any(|(key, _)| !VALID_SECTIONS.contains(&key));
    for (key, _) in doc.iter().filter(|(key, _)| !VALID_SECTIONS.contains(key)) {
        tracing::warn!("Dropping unknown config section '{}'", key);
    }

    let expected = toml::Value::try_from(&settings)?;
    let missing_defaults = expected
        .as_table()
        .into_iter()
        .flatten()
        .any(|(section, values)| {
            let present = doc.get(section).and_then(|item| item.as_table());
            match (present, values.as_table()) {
                (Some(present), Some(values)) => {
                    values.keys().any(|key| !present.contains_key(key))
                }
                _ => true,
            }
        });

    Ok((settings, has_unknown || missing_defaults))
}
