//! Generate Artifacts step - publishes audio and image files per item.
//!
//! Items are processed one at a time in code-assignment order. Each item's
//! outputs are all-or-nothing: when a producer fails, whatever was written
//! for that item is removed and the run stops. Outputs of earlier items
//! are kept.

use std::fs;
use std::path::Path;

use crate::catalog::CatalogEntry;
use crate::generation::ArtifactGenerator;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{RunContext, RunState};

pub struct GenerateArtifactsStep;

impl GenerateArtifactsStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GenerateArtifactsStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for GenerateArtifactsStep {
    fn name(&self) -> &str {
        "Generate Artifacts"
    }

    fn description(&self) -> &str {
        "Extract audio and publish images under each code"
    }

    fn validate_input(&self, ctx: &RunContext) -> StepResult<()> {
        ctx.extractor.preflight()?;
        Ok(())
    }

    fn execute(&self, ctx: &RunContext, state: &mut RunState) -> StepResult<()> {
        let paths = &ctx.settings.paths;
        for dir in [&paths.sounds_output_dir, &paths.images_output_dir] {
            fs::create_dir_all(dir)
                .map_err(|e| StepError::io_error(format!("creating {}", dir), e))?;
        }

        let generator = ArtifactGenerator::standard(ctx.extractor.clone(), &ctx.settings);
        let total = state.planned.len();

        for (index, planned) in state.planned.iter().enumerate() {
            let item = &planned.item;
            let code = &planned.assignment.code;
            ctx.logger.section(&format!(
                "Item {}/{}: id '{}' -> {}",
                index + 1,
                total,
                item.external_id,
                code
            ));
            ctx.logger.clear_tail();

            let audio_output = Path::new(&paths.sounds_output_dir)
                .join(code.file_name(&ctx.settings.sources.audio_extension));
            if let Some(command) = ctx.extractor.command_line(&item.video.path, &audio_output) {
                ctx.logger.command(&command);
            }

            let generated = match generator.generate(item, code) {
                Ok(generated) => generated,
                Err(failure) => {
                    for producer in &failure.failures {
                        for line in producer.error.diagnostics() {
                            ctx.logger.output_line(line, true);
                        }
                        ctx.logger.error(&producer.to_string());
                    }
                    for (action, error) in &failure.rollback.failed {
                        ctx.logger.warn(&format!("Cleanup failed ({}): {}", action, error));
                    }
                    ctx.logger.show_tail(ctx.extractor.name());
                    return Err(StepError::ArtifactsFailed {
                        external_id: item.external_id.clone(),
                        code: code.clone(),
                        failure,
                    });
                }
            };

            for artifact in generated.artifacts {
                for line in &artifact.diagnostics {
                    ctx.logger.output_line(line, true);
                }
                ctx.logger.debug(&format!(
                    "{} wrote {}",
                    artifact.producer,
                    artifact.path.display()
                ));
                state.artifacts.push(artifact.path);
            }

            state.catalog.insert(
                code.clone(),
                CatalogEntry::new(
                    &item.label.display_name,
                    &item.label.secondary_name,
                    &planned.assignment.sequence_label,
                ),
            )?;
        }

        ctx.logger.info(&format!(
            "Generated {} artifact(s) for {} item(s)",
            state.artifacts.len(),
            state.catalog.len()
        ));
        Ok(())
    }

    fn validate_output(&self, _ctx: &RunContext, state: &RunState) -> StepResult<()> {
        if state.catalog.len() != state.planned.len() {
            return Err(StepError::invalid_output(format!(
                "{} of {} items were published",
                state.catalog.len(),
                state.planned.len()
            )));
        }
        if let Some(missing) = state.artifacts.iter().find(|p| !p.exists()) {
            return Err(StepError::invalid_output(format!(
                "Artifact disappeared: {}",
                missing.display()
            )));
        }
        Ok(())
    }
}
