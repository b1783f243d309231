//! Validate Items step - the all-or-nothing completeness gate.

use crate::items::validate_items;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{RunContext, RunState};

/// Requires every joined item to have a video, an image and a label.
///
/// Any violation aborts the run before a code is assigned. Every violation
/// is logged, not just the first.
pub struct ValidateItemsStep;

impl ValidateItemsStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ValidateItemsStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ValidateItemsStep {
    fn name(&self) -> &str {
        "Validate Items"
    }

    fn description(&self) -> &str {
        "Check every item has all required facets"
    }

    fn validate_input(&self, _ctx: &RunContext) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &RunContext, state: &mut RunState) -> StepResult<()> {
        match validate_items(state.items.clone()) {
            Ok(complete) => {
                ctx.logger.validation(&format!(
                    "All {} item(s) have a video, an image and a label",
                    complete.len()
                ));
                state.complete_items = complete;
                Ok(())
            }
            Err(report) => {
                for violation in report.violations() {
                    ctx.logger.validation(&violation.to_string());
                }
                Err(StepError::Incomplete(report))
            }
        }
    }

    fn validate_output(&self, _ctx: &RunContext, state: &RunState) -> StepResult<()> {
        if state.complete_items.len() != state.items.len() {
            return Err(StepError::invalid_output(format!(
                "{} of {} items passed validation",
                state.complete_items.len(),
                state.items.len()
            )));
        }
        Ok(())
    }
}
