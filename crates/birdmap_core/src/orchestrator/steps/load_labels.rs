//! Load Labels step - reads the label registry.

use crate::labels::load_labels;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{RunContext, RunState};

/// Reads the label registry into `RunState::labels`.
///
/// A missing registry is not an error here: it yields an empty store and a
/// warning, and every item then fails validation for lack of a label.
pub struct LoadLabelsStep;

impl LoadLabelsStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoadLabelsStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for LoadLabelsStep {
    fn name(&self) -> &str {
        "Load Labels"
    }

    fn description(&self) -> &str {
        "Read the label registry"
    }

    fn validate_input(&self, _ctx: &RunContext) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &RunContext, state: &mut RunState) -> StepResult<()> {
        let path = ctx.labels_file();
        ctx.logger.info(&format!("Reading labels from {}", path.display()));

        let store = load_labels(path)?;
        for warning in store.warnings() {
            ctx.logger.warn(&warning.to_string());
        }
        ctx.logger.info(&format!(
            "Loaded {} label(s), {} line(s) ignored",
            store.len(),
            store.ignored_lines()
        ));

        state.labels = Some(store);
        Ok(())
    }

    fn validate_output(&self, _ctx: &RunContext, state: &RunState) -> StepResult<()> {
        if state.labels.is_none() {
            return Err(StepError::invalid_output("Label store not recorded"));
        }
        Ok(())
    }
}
