//! Snapshot a whole source tree with `insta`.
//! - Respects `.gitignore` and `.ignore` files
//! - Only includes UTF-8 text files (CRLF→LF); binary files are listed by name
//! - Deterministic path order
//!
//!   Review changes: `cargo insta review`

use ignore::WalkBuilder;
use std::{fs, path::Path};

/// Assert a named snapshot of every file under `root`.
///
/// A macro so the snapshot lands next to the calling test.
#[macro_export]
macro_rules! assert_dir_snapshot {
    ($name:expr, $root:expr) => {
        $crate::insta::assert_snapshot!($name, $crate::snapdir::dir_manifest($root))
    };
}

/// One `=== relative/path` header per file followed by its contents.
pub fn dir_manifest(root: impl AsRef<Path>) -> String {
    let base = fs::canonicalize(root.as_ref()).expect("failed to canonicalize root path");

    let mut wb = WalkBuilder::new(&base);
    wb.hidden(true)
        .git_ignore(true)
        .ignore(true)
        .git_exclude(true)
        .git_global(false)
        .parents(false);

    let mut entries: Vec<(String, String)> = Vec::new();

    for dent in wb.build().filter_map(Result::ok) {
        let p = dent.path();
        if !dent.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let rel = p
            .strip_prefix(&base)
            .expect("path should be within base")
            .to_string_lossy()
            .replace('\\', "/");

        let buf = fs::read(p).expect("failed to read file");
        let body = match std::str::from_utf8(&buf) {
            Ok(s) => {
                let mut body = s.replace("\r\n", "\n");
                if !body.ends_with('\n') {
                    body.push('\n');
                }
                body
            }
            Err(_) => format!("<binary, {} bytes>\n", buf.len()),
        };
        entries.push((rel, body));
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::new();
    for (rel, body) in entries {
        out.push_str(&format!("=== {rel}\n"));
        out.push_str(&body);
    }
    out
}
