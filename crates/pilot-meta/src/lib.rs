//! Option schema and selection for the pilot configuration engine.
//!
//! This crate describes *what* can be configured: option descriptors and
//! their validators, the phase and model option groups, the registry that
//! merges them into one namespace, and the allow-listed actions and models
//! a run can select.

pub mod action;
pub mod constants;
pub mod error;
pub mod group;
pub mod groups;
pub mod models;
pub mod option;
pub mod registry;

pub use action::{Action, ActionSelector};
pub use error::{Error, RegistryError, Result, SelectionError};
pub use group::{GroupScope, OptionGroup};
pub use models::ModelOptionResolver;
pub use option::{OptionDescriptor, OptionValue, Validator};
pub use registry::OptionRegistry;
