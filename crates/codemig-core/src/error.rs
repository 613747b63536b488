use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("missing required anchor: {anchor}")]
    MissingAnchor { anchor: String },

    #[error("unbalanced braces in {anchor} (opened at line {line})")]
    Unbalanced { anchor: String, line: usize },

    #[error("{reason}")]
    Conflict { reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MigrateError {
    pub fn missing(anchor: impl Into<String>) -> Self {
        Self::MissingAnchor {
            anchor: anchor.into(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
