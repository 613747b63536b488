use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use codemig_core::{Batch, BatchReport, Mode, Recipe};
use colored::Colorize;
use log::{debug, info};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::file_walker;
use crate::ui::ConsoleReporter;

/// Suffix used when neither the recipe nor the command line names one.
const DEFAULT_SUFFIX: &str = ".java";

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug, Clone)]
#[command(about = "Run a migration recipe over source files")]
pub struct RunArgs {
    /// Recipe to run: a built-in name (see `codemig recipes`), or the name
    /// declared in the file given with --recipe-file
    #[arg(value_name = "RECIPE")]
    pub recipe: String,

    /// Files or directories to migrate. Directories are walked recursively.
    /// When omitted, the current directory tree is used.
    #[arg(value_name = "PATHS", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Load the recipe from a TOML file instead of the built-ins
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub recipe_file: Option<PathBuf>,

    /// Only walk files whose name ends with this (defaults to the recipe's)
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Report what would change without writing.
    /// Exit with non-zero code if any file needs migrating.
    #[arg(long, conflicts_with = "diff")]
    pub check: bool,

    /// Show diffs instead of writing files
    #[arg(long)]
    pub diff: bool,

    /// Number of files to migrate in parallel
    #[arg(short = 'j', long, default_value_t = 1, value_name = "N")]
    pub jobs: usize,

    /// Include hidden files and directories
    #[arg(long)]
    pub hidden: bool,

    /// Output format for the per-file report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl RunArgs {
    fn mode(&self) -> Mode {
        if self.check {
            Mode::Check
        } else if self.diff {
            Mode::Diff
        } else {
            Mode::Write
        }
    }
}

pub fn execute(args: RunArgs) -> Result<()> {
    let recipe = load_recipe(&args)?;
    let mode = args.mode();
    let suffix = args
        .suffix
        .as_deref()
        .or(recipe.suffix())
        .unwrap_or(DEFAULT_SUFFIX);

    let files = file_walker::collect_source_files(&args.paths, suffix, args.hidden)?;
    debug!("Found {} files matching *{suffix}", files.len());
    if files.is_empty() && args.format == OutputFormat::Text {
        eprintln!("No files matching *{suffix} found");
        return Ok(());
    }

    // Stop between files on Ctrl+C; files not yet started are reported as skipped.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    info!(
        "Running {} over {} files ({mode:?} mode, {} jobs)",
        recipe.name(),
        files.len(),
        args.jobs
    );

    let text = args.format == OutputFormat::Text;
    let reporter = ConsoleReporter::new(std::env::current_dir().ok(), text && args.jobs <= 1);
    let batch = Batch::new(&recipe, mode)
        .jobs(args.jobs)
        .running_flag(running);
    let report = if text {
        batch.run(&files, &reporter)
    } else {
        batch.run(&files, &codemig_core::Silent)
    };

    match args.format {
        OutputFormat::Text => print_text(&report, &reporter),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.has_failures() {
        anyhow::bail!("{} file(s) failed to migrate", report.summary.failed);
    }
    if mode == Mode::Check && report.has_changes() {
        anyhow::bail!("{} file(s) need migrating", report.summary.migrated);
    }
    Ok(())
}

fn load_recipe(args: &RunArgs) -> Result<Recipe> {
    let Some(path) = &args.recipe_file else {
        return Recipe::builtin(&args.recipe)
            .with_context(|| format!("Failed to load recipe `{}`", args.recipe));
    };

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read recipe file {}", path.display()))?;
    let recipe = Recipe::from_toml(&source)
        .with_context(|| format!("Failed to load recipe file {}", path.display()))?;
    if recipe.name() != args.recipe {
        anyhow::bail!(
            "Recipe file {} defines `{}`, not `{}`",
            path.display(),
            recipe.name(),
            args.recipe
        );
    }
    Ok(recipe)
}

fn print_text(report: &BatchReport, reporter: &ConsoleReporter) {
    for file in &report.files {
        if let Some(diff) = &file.diff {
            debug!("Diff for {}", reporter.display_path(&file.path));
            print!("{diff}");
        }
    }
    eprintln!();
    eprintln!("{} {}", "Summary:".bold(), report.summary);
}
