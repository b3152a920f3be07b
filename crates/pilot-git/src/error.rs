//! Error types for pilot-git

use std::path::PathBuf;

/// Result type for pilot-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pilot-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] pilot_fs::Error),

    #[error(transparent)]
    WorkingArea(#[from] WorkingAreaError),
}

/// Reasons a directory cannot serve as the working area.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkingAreaError {
    #[error("Invalid working area. No repository found above {start}")]
    NotFound { start: PathBuf },

    #[error("Invalid working area. {root} is not the '{expected}' project: {reason}")]
    IdentityMismatch {
        root: PathBuf,
        expected: String,
        reason: String,
    },
}
