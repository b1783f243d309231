//! Join Items step - merges facets and labels by external id.

use crate::items::ItemJoiner;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{RunContext, RunState};

/// Builds `RunState::items` in first-appearance order (videos, then images).
pub struct JoinItemsStep;

impl JoinItemsStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JoinItemsStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for JoinItemsStep {
    fn name(&self) -> &str {
        "Join Items"
    }

    fn description(&self) -> &str {
        "Pair videos, images and labels by id"
    }

    fn validate_input(&self, _ctx: &RunContext) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &RunContext, state: &mut RunState) -> StepResult<()> {
        let labels = state
            .labels
            .as_ref()
            .ok_or_else(|| StepError::precondition_failed("Labels have not been loaded"))?;

        let mut joiner = ItemJoiner::new();
        joiner.add_all(state.videos.iter().cloned());
        joiner.add_all(state.images.iter().cloned());

        for facet in joiner.replaced() {
            ctx.logger.warn(&format!(
                "Duplicate {} for id '{}': {} was replaced",
                facet.kind,
                facet.external_id,
                facet.path.display()
            ));
        }

        state.items = joiner.finish(labels);
        ctx.logger.info(&format!("Joined {} item(s)", state.items.len()));
        Ok(())
    }

    fn validate_output(&self, _ctx: &RunContext, state: &RunState) -> StepResult<()> {
        if state.items.is_empty() {
            return Err(StepError::invalid_output("No items were joined"));
        }
        Ok(())
    }
}
