use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// What happened to one file in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "kebab-case")]
pub enum MigrationOutcome {
    /// Trigger absent, or the pipeline produced identical text.
    Unchanged,
    /// Rewritten (or, when not writing, would be).
    Migrated,
    AlreadyMigrated,
    Skipped(String),
    Failed(String),
}

impl MigrationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, MigrationOutcome::Failed(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            MigrationOutcome::Skipped(reason) | MigrationOutcome::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MigrationOutcome::Unchanged => "unchanged",
            MigrationOutcome::Migrated => "migrated",
            MigrationOutcome::AlreadyMigrated => "already migrated",
            MigrationOutcome::Skipped(_) => "skipped",
            MigrationOutcome::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for MigrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{} ({reason})", self.label()),
            None => f.write_str(self.label()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: MigrationOutcome,
    /// Unified diff of the change, in diff mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl FileReport {
    pub fn new(path: impl Into<PathBuf>, outcome: MigrationOutcome) -> Self {
        Self {
            path: path.into(),
            outcome,
            diff: None,
        }
    }
}

/// Per-outcome counts for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub migrated: usize,
    pub already_migrated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: &MigrationOutcome) {
        match outcome {
            MigrationOutcome::Unchanged => self.unchanged += 1,
            MigrationOutcome::Migrated => self.migrated += 1,
            MigrationOutcome::AlreadyMigrated => self.already_migrated += 1,
            MigrationOutcome::Skipped(_) => self.skipped += 1,
            MigrationOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.migrated + self.already_migrated + self.unchanged + self.skipped + self.failed
    }
}

impl<'a> FromIterator<&'a MigrationOutcome> for Summary {
    fn from_iter<I: IntoIterator<Item = &'a MigrationOutcome>>(iter: I) -> Self {
        let mut summary = Summary::default();
        for outcome in iter {
            summary.record(outcome);
        }
        summary
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} migrated, {} already migrated, {} unchanged, {} skipped, {} failed",
            self.migrated, self.already_migrated, self.unchanged, self.skipped, self.failed
        )
    }
}
