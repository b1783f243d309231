//! End-to-end runs of the catalog pipeline against temp directories.
//!
//! The audio converter is replaced with a fake so no external tool is needed.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use birdmap_core::catalog::Catalog;
use birdmap_core::config::Settings;
use birdmap_core::generation::{ArtifactError, ArtifactResult, AudioExtractor, ConversionOutput};
use birdmap_core::logging::{LogConfig, RunLogger, RunLoggerBuilder};
use birdmap_core::models::{ExternalId, FacetKind, PublicCode};
use birdmap_core::orchestrator::{
    run, run_with_state, PipelineError, RunContext, RunOptions, RunState, StepError,
};
use tempfile::{tempdir, TempDir};

/// Writes a tiny file per clip; can be told to fail or to delete a file.
#[derive(Default)]
struct FakeExtractor {
    /// Fail when the clip file name contains this text.
    fail_on: Option<String>,
    /// Remove this file while converting.
    sabotage: Option<PathBuf>,
    /// Refuse preflight.
    missing: bool,
}

impl AudioExtractor for FakeExtractor {
    fn name(&self) -> &str {
        "fake-ffmpeg"
    }

    fn preflight(&self) -> ArtifactResult<()> {
        if self.missing {
            return Err(ArtifactError::ToolMissing {
                tool: "fake-ffmpeg".to_string(),
            });
        }
        Ok(())
    }

    fn extract(&self, video: &Path, output: &Path) -> ArtifactResult<ConversionOutput> {
        if let Some(ref victim) = self.sabotage {
            fs::remove_file(victim).map_err(|e| ArtifactError::io("sabotage", e))?;
        }

        let name = video.file_name().unwrap().to_string_lossy();
        if let Some(ref needle) = self.fail_on {
            if name.contains(needle.as_str()) {
                fs::write(output, b"partial").unwrap();
                return Err(ArtifactError::command_failed(
                    "fake-ffmpeg",
                    1,
                    "Invalid data found when processing input",
                )
                .with_diagnostics(vec![
                    format!("Input #0, from '{}'", name),
                    "Invalid data found when processing input".to_string(),
                ]));
            }
        }

        fs::write(output, b"ID3").unwrap();
        Ok(ConversionOutput {
            output: output.to_path_buf(),
            diagnostics: vec![format!("Input #0, from '{}'", name)],
        })
    }
}

struct Workspace {
    dir: TempDir,
    settings: Settings,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("videos")).unwrap();
        fs::create_dir(dir.path().join("images_cropped")).unwrap();

        let mut settings = Settings::default();
        settings.paths = settings.paths.rooted_at(dir.path());

        Self { dir, settings }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    fn labels(&self, content: &str) -> &Self {
        fs::write(self.path("labels.txt"), content).unwrap();
        self
    }

    fn video(&self, id: &str) -> &Self {
        fs::write(self.path(&format!("videos/Clip({}).mp4", id)), b"mp4").unwrap();
        self
    }

    fn image(&self, id: &str) -> &Self {
        fs::write(self.path(&format!("images_cropped/{}.png", id)), b"png").unwrap();
        self
    }

    fn bird(&self, id: &str) -> &Self {
        self.video(id).image(id)
    }

    fn context(&self, extractor: FakeExtractor, options: RunOptions) -> RunContext {
        RunContext::new(
            self.settings.clone(),
            "test_run",
            Arc::new(RunLogger::detached("test_run", LogConfig::default())),
            Arc::new(extractor),
        )
        .with_options(options)
    }

    fn run(&self, extractor: FakeExtractor) -> (Result<(), PipelineError>, RunState) {
        let ctx = self.context(extractor, RunOptions::default());
        let mut state = RunState::new();
        let result = run_with_state(&ctx, &mut state).map(|_| ());
        (result, state)
    }

    fn files_in(&self, relative: &str) -> Vec<String> {
        let dir = self.path(relative);
        if !dir.exists() {
            return Vec::new();
        }
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

fn step_error(result: Result<(), PipelineError>) -> StepError {
    let PipelineError::StepFailed { source, .. } = result.unwrap_err();
    source
}

#[test]
fn publishes_single_item() {
    let ws = Workspace::new();
    ws.labels("12 Blue Tit, Cyanistes caeruleus\n").bird("12");

    let (result, state) = ws.run(FakeExtractor::default());
    result.unwrap();

    assert_eq!(ws.files_in("sounds"), vec!["e34f.mp3"]);
    assert_eq!(ws.files_in("images"), vec!["e34f.jpg"]);
    assert_eq!(state.artifacts.len(), 2);

    let written = fs::read_to_string(ws.path("birdmap.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "e34f": {"common": "Blue Tit", "scientific": "Cyanistes caeruleus", "id": "001"}
        })
    );
    assert!(written.starts_with("{\n  \"e34f\": {\n    \"common\""));

    let catalog = Catalog::load(&ws.path("birdmap.json")).unwrap();
    assert_eq!(catalog.get(&PublicCode::new("e34f")).unwrap().id, "001");
}

#[test]
fn image_copy_keeps_bytes() {
    let ws = Workspace::new();
    ws.labels("12 Blue Tit, Cyanistes caeruleus\n").bird("12");

    ws.run(FakeExtractor::default()).0.unwrap();

    assert_eq!(fs::read(ws.path("images/e34f.jpg")).unwrap(), b"png");
}

#[test]
fn incomplete_item_blocks_whole_run() {
    let ws = Workspace::new();
    ws.labels("12 Blue Tit, Cyanistes caeruleus\n13 Great Tit, Parus major\n")
        .bird("12")
        .video("13");

    let (result, state) = ws.run(FakeExtractor::default());

    match step_error(result) {
        StepError::Incomplete(report) => {
            assert_eq!(report.len(), 1);
            let missing = report.missing_for(&ExternalId::new("13")).unwrap();
            assert_eq!(missing.iter().copied().collect::<Vec<_>>(), vec![FacetKind::Image]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(state.planned.is_empty());
    assert!(ws.files_in("sounds").is_empty());
    assert!(ws.files_in("images").is_empty());
    assert!(!ws.path("birdmap.json").exists());
}

#[test]
fn every_violation_is_reported() {
    let ws = Workspace::new();
    ws.labels("12 Blue Tit, Cyanistes caeruleus\n14 Robin, Erithacus rubecula\n")
        .video("12")
        .image("13")
        .bird("14");

    match step_error(ws.run(FakeExtractor::default()).0) {
        StepError::Incomplete(report) => {
            assert_eq!(report.len(), 2);
            assert!(report.missing_for(&ExternalId::new("12")).unwrap().contains(&FacetKind::Image));
            let thirteen = report.missing_for(&ExternalId::new("13")).unwrap();
            assert!(thirteen.contains(&FacetKind::Video));
            assert!(thirteen.contains(&FacetKind::Label));
            assert!(report.missing_for(&ExternalId::new("14")).is_none());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn image_failure_removes_audio_of_same_item() {
    let ws = Workspace::new();
    ws.labels("12 Blue Tit, Cyanistes caeruleus\n").bird("12");

    let extractor = FakeExtractor {
        sabotage: Some(ws.path("images_cropped/12.png")),
        ..FakeExtractor::default()
    };
    let (result, state) = ws.run(extractor);

    match step_error(result) {
        StepError::ArtifactsFailed {
            external_id,
            code,
            failure,
        } => {
            assert_eq!(external_id.as_str(), "12");
            assert_eq!(code.as_str(), "e34f");
            assert_eq!(failure.failures.len(), 1);
            assert_eq!(failure.failures[0].producer, "Image");
            assert!(failure.rollback.is_clean());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!ws.path("sounds/e34f.mp3").exists());
    assert!(!ws.path("images/e34f.jpg").exists());
    assert!(state.catalog.is_empty());
    assert!(!ws.path("birdmap.json").exists());
}

#[test]
fn later_failure_stops_run_without_catalog() {
    let ws = Workspace::new();
    ws.labels("12 Blue Tit, Cyanistes caeruleus\n14 Robin, Erithacus rubecula\n15 Wren, Troglodytes troglodytes\n")
        .bird("12")
        .bird("14")
        .bird("15");

    let extractor = FakeExtractor {
        fail_on: Some("(14)".to_string()),
        ..FakeExtractor::default()
    };
    let (result, state) = ws.run(extractor);

    match step_error(result) {
        StepError::ArtifactsFailed { external_id, code, .. } => {
            assert_eq!(external_id.as_str(), "14");
            assert_eq!(code.as_str(), "f05a");
        }
        other => panic!("unexpected error: {other}"),
    }

    // Item 15 was never attempted; item 12 keeps its files.
    assert_eq!(ws.files_in("sounds"), vec!["e34f.mp3"]);
    assert_eq!(ws.files_in("images"), vec!["e34f.jpg"]);
    assert_eq!(state.catalog.len(), 1);
    assert!(!state.catalog.contains(&PublicCode::new("f05a")));
    assert!(!ws.path("birdmap.json").exists());
}

#[test]
fn converter_output_is_dumped_when_item_fails() {
    let ws = Workspace::new();
    ws.labels("12 Blue Tit, Cyanistes caeruleus\n").bird("12");

    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let logger = RunLoggerBuilder::new("test_run")
        .compact(true)
        .callback(Box::new(move |line: &str| sink.lock().unwrap().push(line.to_string())))
        .build()
        .unwrap();
    let extractor = FakeExtractor {
        fail_on: Some("(12)".to_string()),
        ..FakeExtractor::default()
    };
    let ctx = RunContext::new(
        ws.settings.clone(),
        "test_run",
        Arc::new(logger),
        Arc::new(extractor),
    );

    assert!(run(&ctx).is_err());

    let log = lines.lock().unwrap().join("\n");
    let tail = log.find("[fake-ffmpeg/tail]").expect("tail block in run log");
    assert!(log[tail..].contains("Input #0, from 'Clip(12).mp4'"));
    assert!(log[tail..].contains("Invalid data found when processing input"));
}

#[test]
fn catalog_write_failure_keeps_artifacts() {
    let mut ws = Workspace::new();
    ws.labels("12 Blue Tit, Cyanistes caeruleus\n").bird("12");
    fs::create_dir(ws.path("blocked.json")).unwrap();
    ws.settings.paths.catalog_file = ws.path("blocked.json").display().to_string();

    let (result, state) = ws.run(FakeExtractor::default());

    let PipelineError::StepFailed {
        step_name, source, ..
    } = result.unwrap_err();
    assert_eq!(step_name, "Write Catalog");
    assert!(matches!(source, StepError::Catalog(_)));
    assert!(ws.path("sounds/e34f.mp3").exists());
    assert!(ws.path("images/e34f.jpg").exists());
    assert_eq!(state.catalog.len(), 1);
    assert!(ws.path("blocked.json").is_dir());
    assert!(!ws.path("blocked.json.tmp").exists());
}

#[test]
fn codes_follow_join_order_and_are_unique() {
    let ws = Workspace::new();
    ws.labels(
        "10 Blackbird, Turdus merula\n11 Chaffinch, Fringilla coelebs\n\
         12 Blue Tit, Cyanistes caeruleus\n13 Great Tit, Parus major\n",
    );
    for id in ["10", "11", "12", "13"] {
        ws.bird(id);
    }

    let (result, state) = ws.run(FakeExtractor::default());
    result.unwrap();

    let assigned: Vec<(&str, &str, &str)> = state
        .planned
        .iter()
        .map(|p| {
            (
                p.item.external_id.as_str(),
                p.assignment.code.as_str(),
                p.assignment.sequence_label.as_str(),
            )
        })
        .collect();
    assert_eq!(
        assigned,
        vec![
            ("10", "e34f", "001"),
            ("11", "f05a", "002"),
            ("12", "6080", "003"),
            ("13", "072a", "004"),
        ]
    );

    let catalog = Catalog::load(&ws.path("birdmap.json")).unwrap();
    let codes: Vec<&str> = catalog.iter().map(|(code, _)| code.as_str()).collect();
    assert_eq!(codes, vec!["e34f", "f05a", "6080", "072a"]);
}

#[test]
fn reruns_are_reproducible() {
    let build = || {
        let ws = Workspace::new();
        ws.labels("7 Robin, Erithacus rubecula\n3 Wren, Troglodytes troglodytes\n")
            .bird("7")
            .bird("3");
        ws.run(FakeExtractor::default()).0.unwrap();
        fs::read_to_string(ws.path("birdmap.json")).unwrap()
    };

    assert_eq!(build(), build());
}

#[test]
fn empty_sources_abort() {
    let ws = Workspace::new();
    ws.labels("12 Blue Tit, Cyanistes caeruleus\n");

    let result = ws.run(FakeExtractor::default()).0;

    assert!(matches!(step_error(result), StepError::NoSources));
    assert!(!ws.path("birdmap.json").exists());
}

#[test]
fn missing_label_file_surfaces_as_missing_labels() {
    let ws = Workspace::new();
    ws.bird("12");

    let (result, state) = ws.run(FakeExtractor::default());

    match step_error(result) {
        StepError::Incomplete(report) => {
            let missing = report.missing_for(&ExternalId::new("12")).unwrap();
            assert_eq!(missing.iter().copied().collect::<Vec<_>>(), vec![FacetKind::Label]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(state.warning_count(), 1);
}

#[test]
fn missing_converter_fails_before_writing() {
    let ws = Workspace::new();
    ws.labels("12 Blue Tit, Cyanistes caeruleus\n").bird("12");

    let extractor = FakeExtractor {
        missing: true,
        ..FakeExtractor::default()
    };
    let result = ws.run(extractor).0;

    let PipelineError::StepFailed {
        step_name, source, ..
    } = result.unwrap_err();
    assert_eq!(step_name, "Generate Artifacts");
    assert!(matches!(
        source,
        StepError::Artifact(ArtifactError::ToolMissing { .. })
    ));
    assert!(ws.files_in("sounds").is_empty());
    assert!(ws.files_in("images").is_empty());
}

#[test]
fn dry_run_writes_nothing() {
    let ws = Workspace::new();
    ws.labels("12 Blue Tit, Cyanistes caeruleus\n").bird("12");

    let ctx = ws.context(FakeExtractor::default(), RunOptions { dry_run: true });
    let summary = run(&ctx).unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.items, 1);
    assert_eq!(summary.artifacts, 0);
    assert!(summary.catalog_path.is_none());
    assert!(!ws.path("sounds").exists());
    assert!(!ws.path("birdmap.json").exists());
}

#[test]
fn summary_counts_published_items() {
    let ws = Workspace::new();
    ws.labels("12 Blue Tit, Cyanistes caeruleus\n13 Great Tit, Parus major\n")
        .bird("12")
        .bird("13");

    let ctx = ws.context(FakeExtractor::default(), RunOptions::default());
    let summary = run(&ctx).unwrap();

    assert_eq!(summary.catalog_entries, 2);
    assert_eq!(summary.artifacts, 4);
    assert_eq!(summary.catalog_path.as_deref(), Some(ws.path("birdmap.json").as_path()));
    assert!(summary.to_string().starts_with("Published 2 item(s), 4 artifact(s)"));
}
