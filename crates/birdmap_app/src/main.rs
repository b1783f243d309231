//! birdmap command line entry point.
//!
//! Usage:
//!   birdmap [--config birdmap.toml] [--dry-run] [--verbose]
//!   birdmap show [--catalog path/to/birdmap.json]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use birdmap_core::catalog::Catalog;
use birdmap_core::config::{ConfigManager, Settings};
use birdmap_core::generation::FfmpegExtractor;
use birdmap_core::logging::{init_tracing, LogConfig, LogLevel, RunLoggerBuilder};
use birdmap_core::orchestrator::{self, RunContext, RunOptions};

/// Command-line arguments for birdmap
#[derive(Parser, Debug)]
#[command(name = "birdmap")]
#[command(about = "Build the bird catalog from clips, images and labels")]
#[command(version)]
struct Args {
    /// Config file (created with defaults when missing)
    #[arg(short, long, default_value = "birdmap.toml", env = "BIRDMAP_CONFIG")]
    config: PathBuf,

    /// Assign codes and report them without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Log debug output, including converter output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print an existing catalog
    Show {
        /// Catalog file (defaults to the one named in the config)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };
    init_tracing(level);

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: &Args) -> Result<()> {
    let mut manager = ConfigManager::new(&args.config);
    manager
        .load_or_create()
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;

    match args.command {
        Some(Command::Show { ref catalog }) => {
            let path = catalog
                .clone()
                .unwrap_or_else(|| PathBuf::from(&manager.settings().paths.catalog_file));
            show_catalog(&path)
        }
        None => {
            if !args.dry_run {
                manager
                    .ensure_output_dirs()
                    .context("Failed to create output folders")?;
            }
            run_pipeline(manager.into_settings(), args)
        }
    }
}

fn run_pipeline(settings: Settings, args: &Args) -> Result<()> {
    let run_name = orchestrator::default_run_name();

    let mut log_config = LogConfig::from(&settings.logging);
    if args.verbose {
        log_config.level = LogLevel::Debug;
        log_config.compact = false;
    }

    let mut builder = RunLoggerBuilder::new(&run_name)
        .config(log_config)
        .callback(Box::new(|line| println!("{}", line)));
    if settings.logging.write_log_file && !args.dry_run {
        builder = builder.log_dir(&settings.paths.logs_folder);
    }
    let logger = Arc::new(builder.build().context("Failed to open run log")?);
    if let Some(path) = logger.log_path() {
        tracing::info!("Logging run to {}", path.display());
    }

    let extractor = Arc::new(FfmpegExtractor::new(&settings.converter));
    let ctx = RunContext::new(settings, run_name, Arc::clone(&logger), extractor)
        .with_options(RunOptions {
            dry_run: args.dry_run,
        });

    let summary = orchestrator::run(&ctx)?;
    logger.close();

    println!("{}", summary);
    Ok(())
}

fn show_catalog(path: &Path) -> Result<()> {
    let catalog = Catalog::load(path)?;

    for (code, entry) in catalog.iter() {
        println!(
            "{}  {}  {} ({})",
            code, entry.id, entry.common, entry.scientific
        );
    }
    println!("{} entries", catalog.len());
    Ok(())
}
