//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Every field has a default so a partial file is always valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::codes::CodePolicy;
use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathSettings,

    /// File extensions of the collections and artifacts.
    #[serde(default)]
    pub sources: SourceSettings,

    /// External audio converter.
    #[serde(default)]
    pub converter: ConverterSettings,

    /// Public code derivation.
    #[serde(default)]
    pub codes: CodeSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Path configuration for inputs, outputs and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Label registry (`<id> <common>, <scientific>` per line).
    #[serde(default = "default_labels_file")]
    pub labels_file: String,

    /// Folder of source video clips.
    #[serde(default = "default_videos_dir")]
    pub videos_dir: String,

    /// Folder of normalized (cropped) images.
    #[serde(default = "default_images_dir")]
    pub images_dir: String,

    /// Output folder for extracted audio.
    #[serde(default = "default_sounds_output_dir")]
    pub sounds_output_dir: String,

    /// Output folder for published images.
    #[serde(default = "default_images_output_dir")]
    pub images_output_dir: String,

    /// Catalog document written at the end of a run.
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,

    /// Folder for run log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_labels_file() -> String {
    "labels.txt".to_string()
}

fn default_videos_dir() -> String {
    "videos".to_string()
}

fn default_images_dir() -> String {
    "images_cropped".to_string()
}

fn default_sounds_output_dir() -> String {
    "sounds".to_string()
}

fn default_images_output_dir() -> String {
    "images".to_string()
}

fn default_catalog_file() -> String {
    "birdmap.json".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            labels_file: default_labels_file(),
            videos_dir: default_videos_dir(),
            images_dir: default_images_dir(),
            sounds_output_dir: default_sounds_output_dir(),
            images_output_dir: default_images_output_dir(),
            catalog_file: default_catalog_file(),
            logs_folder: default_logs_folder(),
        }
    }
}

impl PathSettings {
    /// Rebase every relative path onto `root`.
    pub fn rooted_at(&self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let rebase = |p: &str| root.join(p).to_string_lossy().to_string();
        Self {
            labels_file: rebase(&self.labels_file),
            videos_dir: rebase(&self.videos_dir),
            images_dir: rebase(&self.images_dir),
            sounds_output_dir: rebase(&self.sounds_output_dir),
            images_output_dir: rebase(&self.images_output_dir),
            catalog_file: rebase(&self.catalog_file),
            logs_folder: rebase(&self.logs_folder),
        }
    }
}

/// File extensions (without the dot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(default = "default_video_extension")]
    pub video_extension: String,

    #[serde(default = "default_image_extension")]
    pub image_extension: String,

    /// Extension of published images.
    #[serde(default = "default_published_image_extension")]
    pub published_image_extension: String,

    /// Extension of extracted audio.
    #[serde(default = "default_audio_extension")]
    pub audio_extension: String,
}

fn default_video_extension() -> String {
    "mp4".to_string()
}

fn default_image_extension() -> String {
    "png".to_string()
}

fn default_published_image_extension() -> String {
    "jpg".to_string()
}

fn default_audio_extension() -> String {
    "mp3".to_string()
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            video_extension: default_video_extension(),
            image_extension: default_image_extension(),
            published_image_extension: default_published_image_extension(),
            audio_extension: default_audio_extension(),
        }
    }
}

/// External audio converter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterSettings {
    /// Program name or path.
    #[serde(default = "default_program")]
    pub program: String,

    /// Audio codec passed to `-acodec`.
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// VBR quality passed to `-q:a` (0 is best).
    #[serde(default = "default_quality")]
    pub quality: String,

    /// Overwrite existing output files.
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

fn default_program() -> String {
    "ffmpeg".to_string()
}

fn default_audio_codec() -> String {
    "libmp3lame".to_string()
}

fn default_quality() -> String {
    "0".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            audio_codec: default_audio_codec(),
            quality: default_quality(),
            overwrite: true,
        }
    }
}

/// Public code derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSettings {
    /// Jump applied to the sequence number after a collision.
    #[serde(default = "default_collision_offset")]
    pub collision_offset: u32,

    /// Collisions tolerated per item before the run fails.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Hex characters kept from the digest.
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Zero-padding width of sequence ids.
    #[serde(default = "default_sequence_width")]
    pub sequence_width: usize,
}

fn default_collision_offset() -> u32 {
    CodePolicy::default().collision_offset
}

fn default_max_attempts() -> u32 {
    CodePolicy::default().max_attempts
}

fn default_code_length() -> usize {
    CodePolicy::default().code_length
}

fn default_sequence_width() -> usize {
    CodePolicy::default().sequence_width
}

impl Default for CodeSettings {
    fn default() -> Self {
        Self {
            collision_offset: default_collision_offset(),
            max_attempts: default_max_attempts(),
            code_length: default_code_length(),
            sequence_width: default_sequence_width(),
        }
    }
}

impl CodeSettings {
    pub fn policy(&self) -> CodePolicy {
        CodePolicy {
            collision_offset: self.collision_offset,
            max_attempts: self.max_attempts,
            code_length: self.code_length,
            sequence_width: self.sequence_width,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level of run log messages.
    #[serde(default)]
    pub level: LogLevel,

    /// Keep converter output out of the log unless a step fails.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of converter lines kept for failure diagnosis.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Write a log file per run in the logs folder.
    #[serde(default = "default_true")]
    pub write_log_file: bool,
}

fn default_error_tail() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            compact: true,
            error_tail: default_error_tail(),
            write_log_file: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[paths]"));
        assert!(toml.contains("[converter]"));
        assert!(toml.contains("labels_file"));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[paths]\nvideos_dir = \"clips\"\n[codes]\nmax_attempts = 5";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        // Custom values preserved
        assert_eq!(parsed.paths.videos_dir, "clips");
        assert_eq!(parsed.codes.max_attempts, 5);
        // Defaults applied for missing
        assert_eq!(parsed.paths.images_dir, "images_cropped");
        assert_eq!(parsed.codes.collision_offset, 200);
        assert_eq!(parsed.converter.program, "ffmpeg");
        assert_eq!(parsed.logging.level, LogLevel::Info);
    }

    #[test]
    fn code_settings_map_to_policy() {
        assert_eq!(CodeSettings::default().policy(), CodePolicy::default());
    }

    #[test]
    fn rooted_paths_are_joined() {
        let rooted = PathSettings::default().rooted_at("/data");
        assert_eq!(PathBuf::from(&rooted.videos_dir), PathBuf::from("/data/videos"));
        assert_eq!(
            PathBuf::from(&rooted.catalog_file),
            PathBuf::from("/data/birdmap.json")
        );
    }
}
