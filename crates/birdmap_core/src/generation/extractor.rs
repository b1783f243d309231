//! Audio extraction through an external converter.
//!
//! The pipeline only depends on the [`AudioExtractor`] trait; the default
//! implementation shells out to ffmpeg:
//!
//! ```text
//! ffmpeg -i <video> -vn -acodec libmp3lame -q:a 0 -y <code>.mp3
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::errors::{ArtifactError, ArtifactResult};
use crate::config::ConverterSettings;

/// Result of a successful conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionOutput {
    /// The file that was written.
    pub output: PathBuf,
    /// Diagnostic text emitted by the converter, one entry per line.
    pub diagnostics: Vec<String>,
}

/// Converts a video file into a compressed audio file.
pub trait AudioExtractor: Send + Sync {
    /// Name of the converter (for logging and error context).
    fn name(&self) -> &str;

    /// Check the converter is usable before any item is processed.
    fn preflight(&self) -> ArtifactResult<()> {
        Ok(())
    }

    /// Command line that `extract` would run, if the converter is external.
    fn command_line(&self, _video: &Path, _output: &Path) -> Option<String> {
        None
    }

    /// Extract the audio stream of `video` into `output`.
    ///
    /// Blocks until the conversion has finished.
    fn extract(&self, video: &Path, output: &Path) -> ArtifactResult<ConversionOutput>;
}

/// [`AudioExtractor`] backed by an ffmpeg subprocess.
#[derive(Debug, Clone)]
pub struct FfmpegExtractor {
    program: String,
    audio_codec: String,
    quality: String,
    overwrite: bool,
}

impl FfmpegExtractor {
    pub fn new(settings: &ConverterSettings) -> Self {
        Self {
            program: settings.program.clone(),
            audio_codec: settings.audio_codec.clone(),
            quality: settings.quality.clone(),
            overwrite: settings.overwrite,
        }
    }

    /// Arguments passed to the converter, excluding the program itself.
    pub fn arguments(&self, video: &Path, output: &Path) -> Vec<String> {
        let mut args = vec![
            "-i".to_string(),
            video.display().to_string(),
            "-vn".to_string(),
            "-acodec".to_string(),
            self.audio_codec.clone(),
            "-q:a".to_string(),
            self.quality.clone(),
        ];
        args.push(if self.overwrite { "-y" } else { "-n" }.to_string());
        args.push(output.display().to_string());
        args
    }
}

impl Default for FfmpegExtractor {
    fn default() -> Self {
        Self::new(&ConverterSettings::default())
    }
}

impl AudioExtractor for FfmpegExtractor {
    fn name(&self) -> &str {
        &self.program
    }

    fn preflight(&self) -> ArtifactResult<()> {
        find_in_path(&self.program)
            .map(|path| tracing::debug!("Using converter at {}", path.display()))
            .ok_or_else(|| ArtifactError::ToolMissing {
                tool: self.program.clone(),
            })
    }

    fn command_line(&self, video: &Path, output: &Path) -> Option<String> {
        Some(format!("{} {}", self.program, self.arguments(video, output).join(" ")))
    }

    fn extract(&self, video: &Path, output: &Path) -> ArtifactResult<ConversionOutput> {
        if !video.exists() {
            return Err(ArtifactError::SourceMissing(video.to_path_buf()));
        }

        let args = self.arguments(video, output);
        tracing::debug!("Running: {} {}", self.program, args.join(" "));

        let result = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ArtifactError::SpawnFailed {
                tool: self.program.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&result.stderr);
        let diagnostics: Vec<String> = stderr.lines().map(str::to_string).collect();

        if !result.status.success() {
            let message = diagnostics
                .iter()
                .rev()
                .find(|line| !line.trim().is_empty())
                .cloned()
                .unwrap_or_default();
            return Err(ArtifactError::command_failed(
                &self.program,
                result.status.code().unwrap_or(-1),
                message,
            )
            .with_diagnostics(diagnostics));
        }

        let written = fs::metadata(output).map(|m| m.len() > 0).unwrap_or(false);
        if !written {
            return Err(ArtifactError::OutputMissing(output.to_path_buf()));
        }

        tracing::info!(
            "Extracted audio from {} to {}",
            video.display(),
            output.display()
        );

        Ok(ConversionOutput {
            output: output.to_path_buf(),
            diagnostics,
        })
    }
}

/// Resolve a program name against `PATH`.
///
/// A name containing a path separator is checked as a path instead.
pub fn find_in_path(tool: &str) -> Option<PathBuf> {
    let candidate = Path::new(tool);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path_var = env::var_os("PATH")?;
    for dir in env::split_paths(&path_var) {
        let full = dir.join(tool);
        if full.is_file() {
            return Some(full);
        }
        #[cfg(windows)]
        {
            let exe = dir.join(format!("{tool}.exe"));
            if exe.is_file() {
                return Some(exe);
            }
        }
    }
    None
}
