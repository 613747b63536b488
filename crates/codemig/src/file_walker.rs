use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Directories that never hold sources to migrate.
const SKIPPED_DIRS: &[&str] = &["vendor", "target", "build"];

/// Walk directories and process files whose name ends with `suffix`
///
/// Features:
/// - Always recursive traversal
/// - Always skips vendor/, target/ and build/ directories
/// - Always respects git ignore patterns
/// - Explicit file arguments are passed through whatever their name
pub fn walk_source_files<F>(
    paths: &[impl AsRef<Path>],
    suffix: &str,
    hidden: bool,
    mut processor: F,
) -> Result<usize>
where
    F: FnMut(&Path) -> Result<()>,
{
    let walk_paths: Vec<_> = if paths.is_empty() {
        vec![std::env::current_dir()?]
    } else {
        paths.iter().map(|p| p.as_ref().to_path_buf()).collect()
    };

    let mut found_files = 0;

    for root in walk_paths {
        if root.is_file() {
            processor(&root)?;
            found_files += 1;
            continue;
        }
        if !root.exists() {
            anyhow::bail!("Path does not exist: {}", root.display());
        }

        let mut builder = WalkBuilder::new(&root);
        builder
            .hidden(!hidden)
            .git_ignore(true)
            .git_exclude(true)
            .git_global(true)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                !(is_dir
                    && entry.depth() > 0
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
            });

        for result in builder.build() {
            let entry = result.with_context(|| format!("Failed to walk {}", root.display()))?;
            let path = entry.path();

            let matches = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(suffix));
            if matches && path.is_file() {
                processor(path)?;
                found_files += 1;
            }
        }
    }

    Ok(found_files)
}

/// Walk directories and collect matching file paths into a Vec
///
/// Returns deterministically sorted paths.
pub fn collect_source_files(
    paths: &[impl AsRef<Path>],
    suffix: &str,
    hidden: bool,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_source_files(paths, suffix, hidden, |path| {
        files.push(path.to_path_buf());
        Ok(())
    })?;
    files.sort();
    Ok(files)
}
