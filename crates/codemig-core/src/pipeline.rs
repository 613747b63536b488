use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::guard::Verdict;
use crate::recipe::Recipe;

/// Result of running a recipe over one text in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    AlreadyMigrated,
    NotApplicable,
    /// The text after every step; may equal the input.
    Rewritten(String),
}

/// Guard, anchors, codemods in recipe order, then import reconciliation.
/// Each step sees the cumulative output of the previous ones. Pure: nothing
/// here touches storage.
pub fn rewrite(recipe: &Recipe, path: &Path, content: &str) -> Result<Rewrite> {
    match recipe.guard().should_migrate(content)? {
        Verdict::AlreadyMigrated => return Ok(Rewrite::AlreadyMigrated),
        Verdict::NotApplicable => return Ok(Rewrite::NotApplicable),
        Verdict::Proceed => {}
    }

    let ctx = recipe.prepare(path, content)?;
    let mut text = content.to_string();

    for codemod in recipe.codemods() {
        if !codemod.detect(&ctx, &text)? {
            debug!("{}: {} has nothing to do", path.display(), codemod.name());
            continue;
        }
        if let Some(updated) = codemod.apply(&ctx, &text)? {
            debug!("{}: applied {}", path.display(), codemod.name());
            text = updated;
        }
    }

    if let Some(updated) = recipe.imports().reconcile(&text) {
        debug!("{}: reconciled imports", path.display());
        text = updated;
    }

    Ok(Rewrite::Rewritten(text))
}
