//! Pipeline orchestrator for a catalog run.
//!
//! A run is a fixed sequence of steps that validate, execute, and record
//! their results in a shared [`RunState`]. The first failing step stops
//! the run.
//!
//! # Architecture
//!
//! ```text
//! Pipeline
//!     ├── Step: Load Labels
//!     ├── Step: Scan Sources
//!     ├── Step: Join Items
//!     ├── Step: Validate Items      (all-or-nothing gate)
//!     ├── Step: Assign Codes        (dry run stops here)
//!     ├── Step: Generate Artifacts  (per-item rollback, abort on failure)
//!     └── Step: Write Catalog
//! ```
//!
//! # Example
//!
//! ```ignore
//! use birdmap_core::orchestrator::{run, RunContext, RunOptions};
//!
//! let ctx = RunContext::new(settings, "birdmap", logger, extractor)
//!     .with_options(RunOptions { dry_run: false });
//! let summary = run(&ctx)?;
//! println!("{}", summary);
//! ```

mod errors;
mod pipeline;
mod step;
pub mod steps;
mod types;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use step::PipelineStep;
pub use steps::{
    AssignCodesStep, GenerateArtifactsStep, JoinItemsStep, LoadLabelsStep, ScanSourcesStep,
    ValidateItemsStep, WriteCatalogStep,
};
pub use types::{PlannedItem, RunContext, RunOptions, RunState, RunSummary};

/// Create the standard pipeline with all steps in the correct order.
///
/// With `dry_run` set the pipeline ends after code assignment, so nothing
/// is written.
pub fn create_standard_pipeline(options: RunOptions) -> Pipeline {
    let pipeline = Pipeline::new()
        .with_step(LoadLabelsStep::new())
        .with_step(ScanSourcesStep::new())
        .with_step(JoinItemsStep::new())
        .with_step(ValidateItemsStep::new())
        .with_step(AssignCodesStep::new());

    if options.dry_run {
        return pipeline;
    }

    pipeline
        .with_step(GenerateArtifactsStep::new())
        .with_step(WriteCatalogStep::new())
}

/// Run the standard pipeline, recording into `state`.
pub fn run_with_state(ctx: &RunContext, state: &mut RunState) -> PipelineResult<RunSummary> {
    let pipeline = create_standard_pipeline(ctx.options);
    pipeline.run(ctx, state)?;

    let summary = state.summary(ctx.options.dry_run);
    ctx.logger.success(&summary.to_string());
    Ok(summary)
}

/// Run the standard pipeline from a fresh state.
pub fn run(ctx: &RunContext) -> PipelineResult<RunSummary> {
    run_with_state(ctx, &mut RunState::new())
}

/// Run name derived from the current local time.
pub fn default_run_name() -> String {
    format!("birdmap_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}
