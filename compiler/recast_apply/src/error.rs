//! Diff application errors.

use std::io;

use recast_ir::EditConflict;

/// Applying a diff to one file failed, or the run could not start.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("file {path} not found")]
    NotFound { path: String },

    #[error("I/O error for file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The file no longer has the text the diff was computed against.
    #[error("could not apply diff to file {path}: {reason}")]
    NotApplicable { path: String, reason: String },

    #[error("conflicting edits in file {path}: {source}")]
    Conflict {
        path: String,
        #[source]
        source: EditConflict,
    },

    #[error("failed to start diff worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ApplyError {
    pub(crate) fn io(path: &str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            ApplyError::NotFound { path: path.to_string() }
        } else {
            ApplyError::Io {
                path: path.to_string(),
                source,
            }
        }
    }

    /// The file this error concerns, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            ApplyError::NotFound { path }
            | ApplyError::Io { path, .. }
            | ApplyError::NotApplicable { path, .. }
            | ApplyError::Conflict { path, .. } => Some(path),
            ApplyError::ThreadPool(_) => None,
        }
    }
}
