use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::Serialize;

use crate::mutator::{self, Mode};
use crate::outcome::{FileReport, MigrationOutcome, Summary};
use crate::recipe::Recipe;

/// Progress callbacks. Called from worker threads when running in parallel.
pub trait Reporter: Sync {
    fn file_started(&self, _path: &Path) {}

    fn file_finished(&self, _report: &FileReport) {}
}

/// Reporter that ignores everything.
pub struct Silent;

impl Reporter for Silent {}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub summary: Summary,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }

    /// Whether any file was (or in check mode would be) rewritten.
    pub fn has_changes(&self) -> bool {
        self.summary.migrated > 0
    }
}

/// Runs one recipe over a file list. One file's failure never stops the
/// others.
pub struct Batch<'a> {
    recipe: &'a Recipe,
    mode: Mode,
    jobs: usize,
    running: Option<Arc<AtomicBool>>,
}

impl<'a> Batch<'a> {
    pub fn new(recipe: &'a Recipe, mode: Mode) -> Self {
        Self {
            recipe,
            mode,
            jobs: 1,
            running: None,
        }
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Stop starting new files once `running` is cleared. Files not yet
    /// started are reported as skipped.
    pub fn running_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = Some(running);
        self
    }

    pub fn run(&self, paths: &[PathBuf], reporter: &dyn Reporter) -> BatchReport {
        let paths = dedup(paths);

        let mut files = if self.jobs > 1 && paths.len() > 1 {
            match ThreadPoolBuilder::new()
                .num_threads(self.jobs)
                .thread_name(|idx| format!("codemig-{idx}"))
                .build()
            {
                Ok(pool) => pool.install(|| {
                    paths
                        .par_iter()
                        .map(|path| self.process(path, reporter))
                        .collect::<Vec<_>>()
                }),
                Err(e) => {
                    warn!("Failed to build worker pool, running sequentially: {e}");
                    self.run_sequential(&paths, reporter)
                }
            }
        } else {
            self.run_sequential(&paths, reporter)
        };

        files.sort_by(|a, b| a.path.cmp(&b.path));
        let summary: Summary = files.iter().map(|f| &f.outcome).collect();
        BatchReport { files, summary }
    }

    fn run_sequential(&self, paths: &[PathBuf], reporter: &dyn Reporter) -> Vec<FileReport> {
        paths
            .iter()
            .map(|path| self.process(path, reporter))
            .collect()
    }

    fn process(&self, path: &Path, reporter: &dyn Reporter) -> FileReport {
        if self
            .running
            .as_ref()
            .is_some_and(|running| !running.load(Ordering::SeqCst))
        {
            return FileReport::new(path, MigrationOutcome::Skipped("interrupted".into()));
        }

        reporter.file_started(path);
        let report = mutator::migrate(self.recipe, path, self.mode);
        debug!("{}: {}", path.display(), report.outcome);
        reporter.file_finished(&report);
        report
    }
}

/// Drop repeated paths, comparing canonical forms so two spellings of one
/// file are only processed once.
fn dedup(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .filter(|path| {
            let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
            seen.insert(key)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const LEGACY: &str = "@Rule(key = \"MS1\")\npublic class ACheck implements MuleSoftCheck {\n}\n";

    #[derive(Default)]
    struct Recording(Mutex<Vec<PathBuf>>);

    impl Reporter for Recording {
        fn file_finished(&self, report: &FileReport) {
            self.0.lock().unwrap().push(report.path.clone());
        }
    }

    fn tree() -> (TempDir, Vec<PathBuf>) {
        let dir = TempDir::new().unwrap();
        let files = [
            ("ACheck.java", LEGACY),
            ("BCheck.java", "public class BCheck implements MuleSoftCheck {\n}\n"),
            ("CCheck.java", LEGACY),
        ];
        let paths = files
            .iter()
            .map(|(name, content)| {
                let path = dir.path().join(name);
                fs::write(&path, content).unwrap();
                path
            })
            .collect();
        (dir, paths)
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let recipe = Recipe::builtin("base-check").unwrap();
        let (_dir, paths) = tree();
        let report = Batch::new(&recipe, Mode::Write).run(&paths, &Silent);
        assert_eq!(report.summary.migrated, 2);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.total(), paths.len());
        assert!(report.has_failures());
    }

    #[test]
    fn test_parallel_results_are_sorted_and_deduplicated() {
        let recipe = Recipe::builtin("base-check").unwrap();
        let (dir, mut paths) = tree();
        paths.reverse();
        paths.push(dir.path().join(".").join("ACheck.java"));

        let recorder = Recording::default();
        let report = Batch::new(&recipe, Mode::Check).jobs(4).run(&paths, &recorder);
        assert_eq!(report.files.len(), 3);
        assert_eq!(recorder.0.lock().unwrap().len(), 3);
        let names: Vec<_> = report
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["ACheck.java", "BCheck.java", "CCheck.java"]);
        assert!(report.has_changes());
        assert_eq!(fs::read_to_string(&paths[0]).unwrap(), LEGACY);
    }

    #[test]
    fn test_cancelled_batch_skips_remaining_files() {
        let recipe = Recipe::builtin("base-check").unwrap();
        let (_dir, paths) = tree();
        let running = Arc::new(AtomicBool::new(false));
        let report = Batch::new(&recipe, Mode::Write)
            .running_flag(running)
            .run(&paths, &Silent);
        assert_eq!(report.summary.skipped, 3);
        assert!(
            report
                .files
                .iter()
                .all(|f| f.outcome == MigrationOutcome::Skipped("interrupted".into()))
        );
    }
}
