//! Option groups
//!
//! A group is an ordered set of descriptors belonging to one pipeline phase
//! or to one pluggable model. Order is the order a front end lists flags in.

use crate::OptionDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an option group configures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupScope {
    General,
    Training,
    Data,
    Evaluation,
    Conversion,
    /// Options contributed by a pluggable model
    Model(String),
}

impl GroupScope {
    pub fn is_model(&self) -> bool {
        matches!(self, GroupScope::Model(_))
    }
}

impl fmt::Display for GroupScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupScope::General => write!(f, "general"),
            GroupScope::Training => write!(f, "training"),
            GroupScope::Data => write!(f, "data"),
            GroupScope::Evaluation => write!(f, "evaluation"),
            GroupScope::Conversion => write!(f, "conversion"),
            GroupScope::Model(name) => write!(f, "model:{name}"),
        }
    }
}

/// Named, ordered collection of option descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionGroup {
    name: String,
    scope: GroupScope,
    options: Vec<OptionDescriptor>,
}

impl OptionGroup {
    pub fn new(name: impl Into<String>, scope: GroupScope) -> Self {
        Self {
            name: name.into(),
            scope,
            options: Vec::new(),
        }
    }

    /// Group for a pluggable model, named after it.
    pub fn for_model(model: impl Into<String>) -> Self {
        let model = model.into();
        Self::new(model.clone(), GroupScope::Model(model))
    }

    /// Append a descriptor (builder pattern).
    pub fn with(mut self, option: OptionDescriptor) -> Self {
        self.options.push(option);
        self
    }

    /// Append all descriptors of another group, keeping this group's identity.
    pub fn extend(mut self, other: OptionGroup) -> Self {
        self.options.extend(other.options);
        self
    }

    pub fn push(&mut self, option: OptionDescriptor) {
        self.options.push(option);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> &GroupScope {
        &self.scope
    }

    pub fn get(&self, name: &str) -> Option<&OptionDescriptor> {
        self.options.iter().find(|o| o.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDescriptor> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl IntoIterator for OptionGroup {
    type Item = OptionDescriptor;
    type IntoIter = std::vec::IntoIter<OptionDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.into_iter()
    }
}
