//! Pipeline step trait definition.

use super::errors::StepResult;
use super::types::{RunContext, RunState};

/// Trait for pipeline steps.
///
/// The pipeline runner calls these methods in order:
///
/// 1. `validate_input` - Check preconditions before execution
/// 2. `execute` - Perform the step's work
/// 3. `validate_output` - Verify the step produced valid output
///
/// `validate_input` only sees the context, so it is the place for checks
/// that must pass before anything in the run is touched (e.g. that the
/// converter is installed).
pub trait PipelineStep: Send + Sync {
    /// Get the step name (for logging and error context).
    fn name(&self) -> &str;

    /// Validate inputs before execution.
    fn validate_input(&self, ctx: &RunContext) -> StepResult<()>;

    /// Execute the step's main work and record results in `state`.
    fn execute(&self, ctx: &RunContext, state: &mut RunState) -> StepResult<()>;

    /// Validate outputs after `execute` succeeded.
    fn validate_output(&self, ctx: &RunContext, state: &RunState) -> StepResult<()>;

    /// Human-readable description of what this step does.
    fn description(&self) -> &str {
        self.name()
    }
}
