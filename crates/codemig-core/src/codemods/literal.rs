use log::debug;

use super::{Codemod, MigrationContext};
use crate::error::Result;
use crate::matcher::{CodeView, Phrase};

/// Replace every code occurrence of a phrase. Occurrences inside comments or
/// string literals, or glued to a longer identifier, are left alone.
pub struct ReplaceLiteral {
    from: Phrase,
    to: String,
}

impl ReplaceLiteral {
    pub fn new(from: &str, to: impl Into<String>) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            from: Phrase::new(from)?,
            to: to.into(),
        })
    }
}

impl Codemod for ReplaceLiteral {
    fn name(&self) -> &'static str {
        "replace-literal"
    }

    fn detect(&self, _ctx: &MigrationContext, content: &str) -> Result<bool> {
        Ok(self.from.is_present(&CodeView::new(content)))
    }

    fn apply(&self, _ctx: &MigrationContext, content: &str) -> Result<Option<String>> {
        let view = CodeView::new(content);
        let hits = self.from.find_all(&view);
        if hits.is_empty() {
            return Ok(None);
        }

        let mut out = String::with_capacity(content.len());
        let mut last = 0;
        for hit in &hits {
            out.push_str(&content[last..hit.start]);
            out.push_str(&self.to);
            last = hit.end;
        }
        out.push_str(&content[last..]);

        debug!("Replaced {} occurrence(s) of {}", hits.len(), self.from.as_str());
        Ok(Some(out))
    }
}
