//! Error types for pilot-core

/// Result type for pilot-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pilot-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Readiness(#[from] ReadinessError),

    #[error(transparent)]
    Proxy(#[from] ProxyError),

    /// The run log could not be opened
    #[error("Logging sink error: {message}")]
    Sink { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from pilot-fs
    #[error(transparent)]
    Fs(#[from] pilot_fs::Error),

    /// Working area error from pilot-git
    #[error(transparent)]
    Git(#[from] pilot_git::Error),

    /// Schema or selection error from pilot-meta
    #[error(transparent)]
    Meta(#[from] pilot_meta::Error),

    /// Typed read of an option value failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<pilot_fs::PathError> for Error {
    fn from(e: pilot_fs::PathError) -> Self {
        Error::Fs(e.into())
    }
}

impl From<pilot_meta::RegistryError> for Error {
    fn from(e: pilot_meta::RegistryError) -> Self {
        Error::Meta(e.into())
    }
}

impl From<pilot_meta::SelectionError> for Error {
    fn from(e: pilot_meta::SelectionError) -> Self {
        Error::Meta(e.into())
    }
}

/// Operations attempted in the wrong configuration state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Already configured!")]
    AlreadyConfigured,

    #[error("Configuration not yet initialized!")]
    NotConfigured,

    #[error("Config became a frozen class. No further changes possible. Tried setting '{key}'.")]
    Frozen { key: String },

    #[error("Config became a rigid class. No additional options possible. Tried setting '{key}'.")]
    UnknownOptionInRigidState { key: String },

    #[error("Unknown option '{key}'.")]
    UnknownOption { key: String },

    #[error("Cannot move from {from} to {to}.")]
    InvalidTransition { from: String, to: String },
}

/// The piece a run still lacks before it can start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadinessError {
    #[error("No action specified!")]
    ActionMissing,

    #[error("No model specified!")]
    ModelMissing,

    #[error("No model options specified!")]
    ModelOptionsMissing,
}

/// Settings proxy registration and access failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    #[error("Settings model '{name}' already added.")]
    DuplicateSettings { name: String },

    #[error("Field '{field}' of model '{settings}' already exists in model '{existing}'.")]
    FieldCollision {
        field: String,
        settings: String,
        existing: String,
    },

    #[error("No settings field or attribute named '{field}'.")]
    UnknownField { field: String },

    #[error("Invalid value for '{field}' of model '{settings}': {reason}")]
    InvalidValue {
        field: String,
        settings: String,
        reason: String,
    },

    #[error("Settings are frozen. Tried setting '{target}'.")]
    Frozen { target: String },
}
