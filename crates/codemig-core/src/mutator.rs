use std::fs;
use std::io::Write;
use std::path::Path;

use atomicwrites::{AtomicFile, OverwriteBehavior};
use log::{debug, warn};
use similar::TextDiff;

use crate::error::{MigrateError, Result};
use crate::outcome::{FileReport, MigrationOutcome};
use crate::pipeline::{self, Rewrite};
use crate::recipe::Recipe;

/// What to do with a file the pipeline changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Write,
    /// Report only; `Migrated` means "would migrate".
    Check,
    /// Like `Check`, and attach a unified diff to the report.
    Diff,
}

/// Migrate one file. Never panics on bad input and never leaves a partly
/// written file: every error becomes `Failed` with the original untouched.
pub fn migrate(recipe: &Recipe, path: &Path, mode: Mode) -> FileReport {
    match try_migrate(recipe, path, mode) {
        Ok(report) => report,
        Err(e) => {
            warn!("{}: {e}", path.display());
            FileReport::new(path, MigrationOutcome::Failed(e.to_string()))
        }
    }
}

fn try_migrate(recipe: &Recipe, path: &Path, mode: Mode) -> Result<FileReport> {
    let bytes = fs::read(path).map_err(|e| MigrateError::io(path, e))?;
    let Ok(original) = String::from_utf8(bytes) else {
        return Ok(FileReport::new(
            path,
            MigrationOutcome::Skipped("not valid UTF-8".into()),
        ));
    };

    let migrated = match pipeline::rewrite(recipe, path, &original)? {
        Rewrite::AlreadyMigrated => {
            return Ok(FileReport::new(path, MigrationOutcome::AlreadyMigrated));
        }
        Rewrite::NotApplicable => return Ok(FileReport::new(path, MigrationOutcome::Unchanged)),
        Rewrite::Rewritten(text) => text,
    };

    if migrated == original {
        debug!("{}: pipeline produced identical text", path.display());
        return Ok(FileReport::new(path, MigrationOutcome::Unchanged));
    }

    let mut report = FileReport::new(path, MigrationOutcome::Migrated);
    match mode {
        Mode::Write => write_atomic(path, &migrated)?,
        Mode::Check => {}
        Mode::Diff => report.diff = Some(unified_diff(path, &original, &migrated)),
    }
    Ok(report)
}

/// Replace `path` through a temporary file and a rename.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| {
            f.write_all(contents.as_bytes())?;
            f.flush()
        })
        .map_err(|err| {
            let source = match err {
                atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => e,
            };
            MigrateError::io(path, source)
        })
}

pub fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    format!(
        "{}",
        diff.unified_diff().context_radius(3).header(
            &format!("old/{}", path.display()),
            &format!("new/{}", path.display())
        )
    )
}
