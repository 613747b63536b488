//! Import-set reconciliation.
//!
//! Imports are keyed by fully qualified name, with static imports kept in
//! their own key space. Existing lines are never reordered; new lines land
//! next to the block they belong to.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::matcher::{CodeView, Phrase, Span, expand_to_lines, line_end, remove_lines};

static IMPORT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*import\s+(static\s+)?([A-Za-z_$][\w$]*(?:\s*\.\s*[A-Za-z_$][\w$]*)*(?:\s*\.\s*\*)?)\s*;")
        .unwrap()
});

static PACKAGE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*package\s+([\w$.\s]+?)\s*;").unwrap());

/// One import, e.g. `org.sonar.api.rule.RuleKey` or
/// `static org.mockito.Mockito.mock`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportKey {
    pub is_static: bool,
    pub path: String,
}

impl ImportKey {
    /// Parse the form used in recipes: an optional `static ` prefix followed
    /// by a dotted path.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        let (is_static, path) = match spec.strip_prefix("static ") {
            Some(rest) => (true, rest.trim()),
            None => (false, spec),
        };
        let valid = !path.is_empty()
            && path.split('.').all(|seg| {
                !seg.is_empty() && (seg == "*" || seg.bytes().all(crate::matcher::is_ident_byte))
            })
            && path.contains('.');
        valid.then(|| Self {
            is_static,
            path: path.to_string(),
        })
    }

    /// The name code refers to once this import is in scope.
    pub fn simple_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }

    pub fn is_wildcard(&self) -> bool {
        self.path.ends_with(".*")
    }

    /// Package (or, for static imports, owning type) of the imported name.
    pub fn parent(&self) -> &str {
        self.path
            .rsplit_once('.')
            .map(|(parent, _)| parent)
            .unwrap_or("")
    }

    pub fn render(&self) -> String {
        if self.is_static {
            format!("import static {};", self.path)
        } else {
            format!("import {};", self.path)
        }
    }
}

impl std::fmt::Display for ImportKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_static {
            write!(f, "static {}", self.path)
        } else {
            f.write_str(&self.path)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportLine {
    pub key: ImportKey,
    /// The whole line, including its newline.
    pub span: Span,
}

/// The import statements of one file, in source order.
#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    lines: Vec<ImportLine>,
}

impl ImportSet {
    pub fn parse(view: &CodeView<'_>) -> Self {
        let lines = IMPORT_LINE
            .captures_iter(view.masked())
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let path: String = caps
                    .get(2)?
                    .as_str()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                Some(ImportLine {
                    key: ImportKey {
                        is_static: caps.get(1).is_some(),
                        path,
                    },
                    span: expand_to_lines(view.text(), Span::new(whole.start(), whole.end())),
                })
            })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[ImportLine] {
        &self.lines
    }

    /// Whether `key` is already in scope, directly or through a wildcard.
    pub fn covers(&self, key: &ImportKey) -> bool {
        self.lines.iter().any(|line| {
            line.key == *key
                || (line.key.is_static == key.is_static
                    && line.key.is_wildcard()
                    && line.key.parent() == key.parent())
        })
    }

    fn group(&self, is_static: bool) -> Vec<&ImportLine> {
        self.lines
            .iter()
            .filter(|line| line.key.is_static == is_static)
            .collect()
    }
}

pub fn package_of(view: &CodeView<'_>) -> Option<String> {
    let caps = PACKAGE_LINE.captures(view.masked())?;
    Some(
        caps.get(1)?
            .as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect(),
    )
}

/// Adds required imports and drops obsolete ones.
#[derive(Debug, Clone, Default)]
pub struct ImportReconciler {
    add: Vec<ImportKey>,
    drop_if_unused: Vec<ImportKey>,
}

impl ImportReconciler {
    pub fn new(add: Vec<ImportKey>, drop_if_unused: Vec<ImportKey>) -> Self {
        Self {
            add,
            drop_if_unused,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.drop_if_unused.is_empty()
    }

    /// Returns the reconciled text, or `None` when nothing changed.
    pub fn reconcile(&self, content: &str) -> Option<String> {
        let mut text = content.to_string();

        for key in &self.drop_if_unused {
            if let Some(updated) = drop_if_unused(&text, key) {
                text = updated;
            }
        }
        for key in &self.add {
            if let Some(updated) = add_import(&text, key) {
                text = updated;
            }
        }

        (text != content).then_some(text)
    }
}

/// Whether `name` is referenced anywhere in code outside import and package
/// statements.
pub fn is_referenced(view: &CodeView<'_>, imports: &ImportSet, name: &str) -> bool {
    let Ok(phrase) = Phrase::new(name) else {
        return true;
    };
    let package = PACKAGE_LINE
        .find(view.masked())
        .map(|m| Span::new(m.start(), m.end()));
    phrase.find_all(view).into_iter().any(|hit| {
        !imports.lines().iter().any(|line| line.span.contains(hit.start))
            && !package.is_some_and(|p| p.contains(hit.start))
    })
}

fn drop_if_unused(text: &str, key: &ImportKey) -> Option<String> {
    if key.is_wildcard() {
        return None;
    }
    let view = CodeView::new(text);
    let imports = ImportSet::parse(&view);
    let last = imports.lines().iter().rev().find(|line| line.key == *key)?;

    if is_referenced(&view, &imports, key.simple_name()) {
        debug!("Keeping import {key}: still referenced");
        return None;
    }

    debug!("Dropping unused import {key}");
    let span = last.span;
    let updated = remove_lines(text, span);
    // Duplicated import lines go too.
    Some(drop_if_unused(&updated, key).unwrap_or(updated))
}

fn add_import(text: &str, key: &ImportKey) -> Option<String> {
    let view = CodeView::new(text);
    let imports = ImportSet::parse(&view);
    if imports.covers(key) {
        return None;
    }
    if !key.is_static && package_of(&view).as_deref() == Some(key.parent()) {
        return None;
    }

    debug!("Adding import {key}");
    let line = format!("{}\n", key.render());
    let group = imports.group(key.is_static);

    let (at, insert) = if !group.is_empty() {
        let sorted = group.windows(2).all(|w| w[0].key.path <= w[1].key.path);
        let successor = group.iter().find(|l| l.key.path > key.path);
        match (sorted, successor) {
            (true, Some(next)) => (next.span.start, line),
            _ => (group[group.len() - 1].span.end, line),
        }
    } else if let Some(first) = imports.lines().first() {
        if key.is_static {
            // Static imports follow the regular block, separated by a blank line.
            let last = &imports.lines()[imports.lines().len() - 1];
            (last.span.end, format!("\n{line}"))
        } else {
            (first.span.start, format!("{line}\n"))
        }
    } else if let Some(package) = PACKAGE_LINE.find(view.masked()) {
        (line_end(text, package.end()), format!("\n{line}"))
    } else {
        (0, format!("{line}\n"))
    };

    let mut out = String::with_capacity(text.len() + insert.len() + 1);
    out.push_str(&text[..at]);
    if at > 0 && !text[..at].ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&insert);
    out.push_str(&text[at..]);
    Some(out)
}
