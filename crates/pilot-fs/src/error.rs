//! Error types for pilot-fs

use std::path::PathBuf;

/// Result type for pilot-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pilot-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Failed to serialize {format} config for {path}: {message}")]
    ConfigSerialize {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error(transparent)]
    Path(#[from] PathError),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A path option value that cannot be anchored to the working area.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("The '{option}' has an invalid path '{path}'. Must be inside the working area '{working_area}'")]
    NotUnderWorkingArea {
        option: String,
        path: String,
        working_area: String,
    },

    #[error("The '{option}' has an invalid path. '{path}' does not exist")]
    PathDoesNotExist { option: String, path: String },
}
