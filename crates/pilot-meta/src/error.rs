//! Error types for pilot-meta

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("No option group registered for model '{model}'")]
    Resolution { model: String },

    #[error("Invalid value for option '{option}': {reason}")]
    InvalidValue { option: String, reason: String },
}

/// Problems found while merging option groups into one namespace.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Option '{option}' of group '{group}' has no default value.")]
    MissingDefault { option: String, group: String },

    #[error("Option '{option}' of group '{group}' is already registered by group '{existing}'.")]
    DuplicateOption {
        option: String,
        group: String,
        existing: String,
    },
}

/// Rejected model or action selections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Invalid model name '{name}'. Possible model names are: {allowed:?}")]
    InvalidModel { name: String, allowed: Vec<String> },

    #[error("Model name already set to '{current}'. Cannot set it to '{requested}'.")]
    ModelAlreadySet { current: String, requested: String },

    #[error("Invalid action '{name}'. Possible actions are: {allowed:?}")]
    InvalidAction { name: String, allowed: Vec<String> },

    #[error("Action already set to '{current}'. Cannot set it to '{requested}'.")]
    ActionAlreadySet { current: String, requested: String },
}
