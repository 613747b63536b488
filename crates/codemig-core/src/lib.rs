//! Pattern-anchored migration of Java-like sources from one convention to
//! another.
//!
//! A [`Recipe`] describes one migration: an idempotency [`Guard`], required
//! anchors, an ordered list of [`Codemod`] steps and an import policy. The
//! engine runs it in memory over a file's text and writes the result back
//! only when it differs:
//!
//! - [`pipeline::rewrite`] - guard, anchors, codemods, imports over a string
//! - [`mutator::migrate`] - the same for one file on disk, yielding a
//!   [`MigrationOutcome`]
//! - [`Batch`] - many files, optionally in parallel, with cancellation

pub mod batch;
pub mod codemods;
mod error;
pub mod guard;
pub mod imports;
pub mod matcher;
pub mod mutator;
mod outcome;
pub mod pipeline;
pub mod recipe;

pub use batch::{Batch, BatchReport, Reporter, Silent};
pub use codemods::{Codemod, MigrationContext};
pub use error::{MigrateError, Result};
pub use guard::{Guard, Marker, Verdict};
pub use imports::{ImportKey, ImportReconciler};
pub use mutator::Mode;
pub use outcome::{FileReport, MigrationOutcome, Summary};
pub use recipe::{Recipe, RecipeError};
