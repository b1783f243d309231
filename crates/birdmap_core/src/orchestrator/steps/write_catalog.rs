//! Write Catalog step - persists the accumulated catalog once.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{RunContext, RunState};

/// Saves `RunState::catalog` to the configured catalog file.
///
/// A failure here leaves the published artifacts in place.
pub struct WriteCatalogStep;

impl WriteCatalogStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WriteCatalogStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for WriteCatalogStep {
    fn name(&self) -> &str {
        "Write Catalog"
    }

    fn description(&self) -> &str {
        "Write the catalog document"
    }

    fn validate_input(&self, _ctx: &RunContext) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &RunContext, state: &mut RunState) -> StepResult<()> {
        let path = ctx.catalog_file();
        state.catalog.save(path)?;

        ctx.logger.info(&format!(
            "Wrote {} entr{} to {}",
            state.catalog.len(),
            if state.catalog.len() == 1 { "y" } else { "ies" },
            path.display()
        ));
        state.catalog_path = Some(path.to_path_buf());
        Ok(())
    }

    fn validate_output(&self, _ctx: &RunContext, state: &RunState) -> StepResult<()> {
        match state.catalog_path {
            Some(ref path) if path.exists() => Ok(()),
            Some(ref path) => Err(StepError::invalid_output(format!(
                "Catalog not found at {}",
                path.display()
            ))),
            None => Err(StepError::invalid_output("Catalog path not recorded")),
        }
    }
}
