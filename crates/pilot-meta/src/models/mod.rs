//! Model option groups and their resolver
//!
//! Each pluggable model contributes exactly one option group. The resolver
//! maps a model name to the constructor of that group so that new models
//! can be added without touching the configuration engine.

pub mod vae;

use crate::{Error, OptionGroup, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Constructor of a model's option group.
pub type GroupFactory = Arc<dyn Fn() -> OptionGroup + Send + Sync>;

/// Maps model names to their option groups.
#[derive(Clone, Default)]
pub struct ModelOptionResolver {
    factories: BTreeMap<String, GroupFactory>,
}

impl fmt::Debug for ModelOptionResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelOptionResolver")
            .field("models", &self.models())
            .finish()
    }
}

impl ModelOptionResolver {
    /// Empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver that knows the bundled `test` and `vae` models.
    pub fn with_builtins() -> Self {
        let mut resolver = Self::new();
        resolver.register(test::NAME, test::options);
        resolver.register(vae::NAME, vae::options);
        resolver
    }

    /// Register or replace the option group constructor for `model`.
    pub fn register<F>(&mut self, model: impl Into<String>, factory: F)
    where
        F: Fn() -> OptionGroup + Send + Sync + 'static,
    {
        self.factories.insert(model.into(), Arc::new(factory));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_model<F>(mut self, model: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> OptionGroup + Send + Sync + 'static,
    {
        self.register(model, factory);
        self
    }

    /// Option group of `model`.
    pub fn resolve(&self, model: &str) -> Result<OptionGroup> {
        let factory = self.factories.get(model).ok_or_else(|| Error::Resolution {
            model: model.to_string(),
        })?;
        Ok(factory())
    }

    pub fn contains(&self, model: &str) -> bool {
        self.factories.contains_key(model)
    }

    pub fn models(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GroupScope, OptionRegistry};

    #[test]
    fn builtins_resolve_to_model_scoped_groups() {
        let resolver = ModelOptionResolver::with_builtins();

        for model in ["test", "vae"] {
            let group = resolver.resolve(model).unwrap();
            assert_eq!(group.scope(), &GroupScope::Model(model.to_string()));
            OptionRegistry::validate(&group).unwrap();
        }
    }

    #[test]
    fn unknown_model_is_a_resolution_error() {
        let err = ModelOptionResolver::with_builtins()
            .resolve("gan")
            .unwrap_err();
        assert_eq!(err, Error::Resolution { model: "gan".into() });
    }
}
