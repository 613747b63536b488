use log::debug;

use super::{Codemod, MigrationContext};
use crate::error::{MigrateError, Result};
use crate::matcher::{CodeView, Declaration, HeaderClauses, Span, simple_type_name};

/// Swap an implemented interface for a superclass in the anchored class
/// header: `implements A, Old, B` becomes `extends Base implements A, B`.
///
/// The interface is a required anchor. A header that does not list it fails
/// the file rather than letting later steps edit a class that never switched
/// to the base.
pub struct RewriteClause {
    interface: String,
    base: String,
}

impl RewriteClause {
    pub fn new(interface: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            base: base.into(),
        }
    }

    /// Header clauses and the index of the interface being replaced.
    fn locate(&self, view: &CodeView<'_>, decl: &Declaration) -> Result<(HeaderClauses, Span, usize)> {
        let clauses = view.header_clauses(decl);
        let wanted = simple_type_name(&self.interface);
        let target = clauses
            .interfaces
            .iter()
            .position(|entry| simple_type_name(&view.masked()[entry.start..entry.end]) == wanted);
        match (clauses.implements_kw, target) {
            (Some(kw), Some(target)) => Ok((clauses, kw, target)),
            _ => Err(MigrateError::missing(format!(
                "implements {} on class {}",
                self.interface, decl.name
            ))),
        }
    }
}

impl Codemod for RewriteClause {
    fn name(&self) -> &'static str {
        "rewrite-clause"
    }

    fn detect(&self, ctx: &MigrationContext, content: &str) -> Result<bool> {
        let view = CodeView::new(content);
        let decl = ctx.declaration(&view)?;
        self.locate(&view, &decl).map(|_| true)
    }

    fn apply(&self, ctx: &MigrationContext, content: &str) -> Result<Option<String>> {
        let view = CodeView::new(content);
        let decl = ctx.declaration(&view)?;
        let (clauses, implements_kw, target) = self.locate(&view, &decl)?;

        if let Some(extends) = clauses.extends {
            let current = &content[extends.start..extends.end];
            if simple_type_name(current) != simple_type_name(&self.base) {
                return Err(MigrateError::conflict(format!(
                    "class {} already extends {current}; cannot switch it to extends {}",
                    decl.name, self.base
                )));
            }
        }

        let remaining: Vec<&str> = clauses
            .interfaces
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != target)
            .map(|(_, span)| &content[span.start..span.end])
            .collect();
        let implements = if remaining.is_empty() {
            String::new()
        } else {
            format!(" implements {}", remaining.join(", "))
        };

        let last_entry = clauses
            .interfaces
            .last()
            .map(|s| s.end)
            .unwrap_or(implements_kw.end);
        let trailing = &content[last_entry..decl.header.end];
        let prefix = &content[decl.header.start..implements_kw.start];

        let header = if clauses.extends.is_some() {
            format!("{}{implements}{trailing}", prefix.trim_end())
        } else {
            let sep = if prefix.ends_with(char::is_whitespace) { "" } else { " " };
            format!("{prefix}{sep}extends {}{implements}{trailing}", self.base)
        };

        debug!(
            "Rewriting header of {}: {:?} -> {:?}",
            decl.name,
            &content[decl.header.start..decl.header.end],
            header
        );

        let mut out = String::with_capacity(content.len() + header.len());
        out.push_str(&content[..decl.header.start]);
        out.push_str(&header);
        out.push_str(&content[decl.header.end..]);
        Ok(Some(out))
    }
}
