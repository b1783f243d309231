//! Scan Sources step - enumerates the video and image collections.

use crate::models::SourceFacet;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{RunContext, RunState};
use crate::scanning::{scan_images, scan_videos, ScanWarning, SourceScanner};

/// Scans videos first, then images, recording facets and skipped entries.
///
/// Fails with [`StepError::NoSources`] when both collections are empty.
pub struct ScanSourcesStep;

impl ScanSourcesStep {
    pub fn new() -> Self {
        Self
    }

    /// Collect a scanner, logging and recording what it skipped.
    fn drain(
        ctx: &RunContext,
        warnings_out: &mut Vec<ScanWarning>,
        mut scanner: SourceScanner,
        what: &str,
    ) -> Vec<SourceFacet> {
        let facets: Vec<SourceFacet> = scanner.by_ref().collect();
        let warnings = scanner.into_warnings();

        for warning in &warnings {
            ctx.logger.warn(&warning.to_string());
        }
        ctx.logger.info(&format!(
            "Found {} {} file(s) ({} skipped)",
            facets.len(),
            what,
            warnings.len()
        ));

        warnings_out.extend(warnings);
        facets
    }
}

impl Default for ScanSourcesStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ScanSourcesStep {
    fn name(&self) -> &str {
        "Scan Sources"
    }

    fn description(&self) -> &str {
        "Enumerate video clips and cropped images"
    }

    fn validate_input(&self, _ctx: &RunContext) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &RunContext, state: &mut RunState) -> StepResult<()> {
        let sources = &ctx.settings.sources;

        ctx.logger.info(&format!("Scanning {}", ctx.videos_dir().display()));
        let videos = scan_videos(ctx.videos_dir(), &sources.video_extension);
        state.videos = Self::drain(ctx, &mut state.scan_warnings, videos, "video");

        ctx.logger.info(&format!("Scanning {}", ctx.images_dir().display()));
        let images = scan_images(ctx.images_dir(), &sources.image_extension);
        state.images = Self::drain(ctx, &mut state.scan_warnings, images, "image");

        if state.videos.is_empty() && state.images.is_empty() {
            return Err(StepError::NoSources);
        }

        Ok(())
    }

    fn validate_output(&self, _ctx: &RunContext, state: &RunState) -> StepResult<()> {
        if state.videos.is_empty() && state.images.is_empty() {
            return Err(StepError::NoSources);
        }
        Ok(())
    }
}
