//! Assign Codes step - binds every validated item to a public code.

use std::collections::HashSet;

use crate::codes::CodeAssignor;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{PlannedItem, RunContext, RunState};

/// Assigns codes in join order before anything is written.
///
/// Running the whole assignment up front means code-space exhaustion is
/// reported before any artifact exists.
pub struct AssignCodesStep;

impl AssignCodesStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AssignCodesStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for AssignCodesStep {
    fn name(&self) -> &str {
        "Assign Codes"
    }

    fn description(&self) -> &str {
        "Derive a unique public code for every item"
    }

    fn validate_input(&self, _ctx: &RunContext) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &RunContext, state: &mut RunState) -> StepResult<()> {
        let mut assignor = CodeAssignor::new(ctx.settings.codes.policy());
        let items = std::mem::take(&mut state.complete_items);
        let mut planned = Vec::with_capacity(items.len());

        for item in items {
            let assignment = assignor
                .assign()
                .map_err(|source| StepError::CodeSpaceExhausted {
                    external_id: item.external_id.clone(),
                    source,
                })?;

            if assignment.collisions > 0 {
                ctx.logger.warn(&format!(
                    "Code for id '{}' collided {} time(s); hashed '{}' instead",
                    item.external_id, assignment.collisions, assignment.hashed_input
                ));
            }
            ctx.logger.info(&format!(
                "  {} -> {} (#{}) {}",
                item.external_id, assignment.code, assignment.sequence_label, item.label.display_name
            ));

            planned.push(PlannedItem { item, assignment });
        }

        state.planned = planned;
        Ok(())
    }

    fn validate_output(&self, _ctx: &RunContext, state: &RunState) -> StepResult<()> {
        let unique: HashSet<_> = state.planned.iter().map(|p| &p.assignment.code).collect();
        if unique.len() != state.planned.len() {
            return Err(StepError::invalid_output("Duplicate public codes assigned"));
        }
        Ok(())
    }
}
