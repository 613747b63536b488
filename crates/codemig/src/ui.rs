//! Terminal output: spinners, status icons and per-file lines.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use codemig_core::{FileReport, MigrationOutcome, Reporter};
use colored::{ColoredString, Colorize};
use indicatif::ProgressBar;

pub mod icons {
    use colored::{ColoredString, Colorize};

    pub fn success() -> ColoredString {
        "✓".green()
    }

    pub fn warning() -> ColoredString {
        "!".yellow()
    }

    pub fn error() -> ColoredString {
        "✗".red()
    }

    pub fn neutral() -> ColoredString {
        "-".dimmed()
    }
}

/// A spinner on stderr; hidden when stderr is not a terminal.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn start(message: impl Into<Cow<'static, str>>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message(message);
        Self { bar }
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}

/// Prints one line per finished file to stderr, with a spinner for the file
/// in progress when running sequentially.
pub struct ConsoleReporter {
    base: Option<PathBuf>,
    spinners: bool,
    current: Mutex<Option<Spinner>>,
}

impl ConsoleReporter {
    pub fn new(base: Option<PathBuf>, spinners: bool) -> Self {
        Self {
            base,
            spinners,
            current: Mutex::new(None),
        }
    }

    pub fn display_path(&self, path: &Path) -> String {
        self.base
            .as_ref()
            .and_then(|base| pathdiff::diff_paths(path, base))
            .filter(|rel| !rel.starts_with(".."))
            .unwrap_or_else(|| path.to_path_buf())
            .display()
            .to_string()
    }

    fn take_spinner(&self) -> Option<Spinner> {
        self.current.lock().ok().and_then(|mut current| current.take())
    }
}

impl Reporter for ConsoleReporter {
    fn file_started(&self, path: &Path) {
        if !self.spinners {
            return;
        }
        let spinner = Spinner::start(format!("{}: Migrating", self.display_path(path)));
        if let Ok(mut current) = self.current.lock() {
            if let Some(previous) = current.replace(spinner) {
                previous.finish();
            }
        }
    }

    fn file_finished(&self, report: &FileReport) {
        if let Some(spinner) = self.take_spinner() {
            spinner.finish();
        }
        eprintln!("{}", status_line(&self.display_path(&report.path), &report.outcome));
    }
}

pub fn status_line(path: &str, outcome: &MigrationOutcome) -> String {
    let (icon, path): (ColoredString, ColoredString) = match outcome {
        MigrationOutcome::Migrated => (icons::success(), path.green().bold()),
        MigrationOutcome::AlreadyMigrated | MigrationOutcome::Unchanged => {
            (icons::neutral(), path.normal())
        }
        MigrationOutcome::Skipped(_) => (icons::warning(), path.yellow()),
        MigrationOutcome::Failed(_) => (icons::error(), path.red().bold()),
    };
    format!("{icon} {path}: {}", outcome.to_string().dimmed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line() {
        colored::control::set_override(false);
        assert_eq!(
            status_line("src/FooCheck.java", &MigrationOutcome::Migrated),
            "✓ src/FooCheck.java: migrated"
        );
        assert_eq!(
            status_line("A.java", &MigrationOutcome::Failed("boom".into())),
            "✗ A.java: failed (boom)"
        );
    }

    #[test]
    fn test_display_path_is_relative_to_base() {
        let reporter = ConsoleReporter::new(Some(PathBuf::from("/work")), false);
        assert_eq!(reporter.display_path(Path::new("/work/src/A.java")), "src/A.java");
        assert_eq!(reporter.display_path(Path::new("/elsewhere/A.java")), "/elsewhere/A.java");
    }
}
