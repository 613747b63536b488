use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::matcher::{CodeView, Declaration};

pub mod clause;
pub mod constants;
pub mod inject;
pub mod literal;
pub mod methods;

pub use clause::RewriteClause;
pub use constants::{LiteralShape, RemoveConstant};
pub use inject::{InjectMethod, Template};
pub use literal::ReplaceLiteral;
pub use methods::RemoveMethod;

/// Values resolved from a file's required anchors before any codemod runs.
#[derive(Debug, Clone, Default)]
pub struct MigrationContext {
    pub path: PathBuf,
    pub package: Option<String>,
    /// Name of the anchored class, when the recipe requires one.
    pub class_name: Option<String>,
    /// Captured anchor values keyed by capture name (e.g. `rule_key`).
    pub values: BTreeMap<String, String>,
}

impl MigrationContext {
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Re-locate the anchored class in the current text. Earlier codemods may
    /// have moved it, so this runs against every intermediate text.
    pub fn declaration(&self, view: &CodeView<'_>) -> Result<Declaration> {
        view.find_class(self.class_name.as_deref())
    }
}

/// One ordered step of a migration.
///
/// `detect` is a cheap check for whether the step has anything to do;
/// `apply` returns the rewritten text, or `None` when the text is left as is.
/// A step either produces a complete new text or an error, never a partial
/// edit.
pub trait Codemod: Send + Sync {
    fn name(&self) -> &'static str;

    fn detect(&self, ctx: &MigrationContext, content: &str) -> Result<bool>;

    fn apply(&self, ctx: &MigrationContext, content: &str) -> Result<Option<String>>;
}
