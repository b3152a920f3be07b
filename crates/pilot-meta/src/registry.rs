//! Option registry
//!
//! Merges option groups into the single flat namespace a run is configured
//! through. Collisions are detected eagerly: every `register` call checks
//! the incoming group against everything already present, so a registry
//! value is always collision-free.

use crate::{GroupScope, OptionDescriptor, OptionGroup, RegistryError, Result};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Entry {
    descriptor: OptionDescriptor,
    group: String,
}

#[derive(Debug, Clone)]
struct GroupInfo {
    name: String,
    scope: GroupScope,
    len: usize,
}

/// Flat, collision-free namespace of option descriptors.
///
/// # Example
///
/// ```
/// use pilot_meta::{OptionRegistry, groups};
///
/// let registry = OptionRegistry::merge(groups::builtin_groups()).unwrap();
/// assert!(registry.contains("learning_rate"));
/// assert_eq!(registry.group_of("learning_rate"), Some("training"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    options: BTreeMap<String, Entry>,
    groups: Vec<GroupInfo>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from groups, registering them in order.
    pub fn merge<I>(groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = OptionGroup>,
    {
        let mut registry = Self::new();
        for group in groups {
            registry.register(group)?;
        }
        Ok(registry)
    }

    /// Check a group on its own.
    ///
    /// Every descriptor must declare a default that passes its own
    /// validator, and names must be unique within the group.
    pub fn validate(group: &OptionGroup) -> Result<()> {
        let mut seen: Vec<&str> = Vec::with_capacity(group.len());
        for option in group.iter() {
            let Some(default) = &option.default else {
                return Err(RegistryError::MissingDefault {
                    option: option.name.clone(),
                    group: group.name().to_string(),
                }
                .into());
            };
            option.check(default)?;
            if seen.contains(&option.name.as_str()) {
                return Err(RegistryError::DuplicateOption {
                    option: option.name.clone(),
                    group: group.name().to_string(),
                    existing: group.name().to_string(),
                }
                .into());
            }
            seen.push(&option.name);
        }
        Ok(())
    }

    /// Validate `group` and add it to the namespace.
    ///
    /// Nothing is added if any of its names is already registered.
    pub fn register(&mut self, group: OptionGroup) -> Result<()> {
        Self::validate(&group)?;

        if let Some((option, existing)) = group
            .iter()
            .find_map(|o| self.options.get(&o.name).map(|e| (&o.name, &e.group)))
        {
            return Err(RegistryError::DuplicateOption {
                option: option.clone(),
                group: group.name().to_string(),
                existing: existing.clone(),
            }
            .into());
        }

        let name = group.name().to_string();
        tracing::trace!(group = %name, options = group.len(), "Registering option group");
        self.groups.push(GroupInfo {
            name: name.clone(),
            scope: group.scope().clone(),
            len: group.len(),
        });
        for descriptor in group {
            self.options.insert(
                descriptor.name.clone(),
                Entry {
                    descriptor,
                    group: name.clone(),
                },
            );
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&OptionDescriptor> {
        self.options.get(name).map(|e| &e.descriptor)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// Name of the group that registered `name`.
    pub fn group_of(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(|e| e.group.as_str())
    }

    /// All option names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.options.keys().map(String::as_str).collect()
    }

    /// All descriptors, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &OptionDescriptor> {
        self.options.values().map(|e| &e.descriptor)
    }

    /// Registered group names in registration order.
    pub fn groups(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    /// Whether a group with `scope` has been registered.
    pub fn has_scope(&self, scope: &GroupScope) -> bool {
        self.groups.iter().any(|g| &g.scope == scope)
    }

    /// Number of options registered by the group with `scope`.
    pub fn scope_len(&self, scope: &GroupScope) -> Option<usize> {
        self.groups.iter().find(|g| &g.scope == scope).map(|g| g.len)
    }

    /// Descriptors registered by groups with `scope`, sorted by name.
    pub fn options_in(&self, scope: &GroupScope) -> Vec<&OptionDescriptor> {
        let owners: Vec<&str> = self
            .groups
            .iter()
            .filter(|g| &g.scope == scope)
            .map(|g| g.name.as_str())
            .collect();
        self.options
            .values()
            .filter(|e| owners.contains(&e.group.as_str()))
            .map(|e| &e.descriptor)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;

    fn group(name: &str, options: &[&str]) -> OptionGroup {
        options.iter().fold(
            OptionGroup::new(name, GroupScope::General),
            |g, option| g.with(OptionDescriptor::new(*option, "").with_default(json!(0))),
        )
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = OptionRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_duplicate_inside_one_group() {
        let err = OptionRegistry::validate(&group("g", &["a", "a"])).unwrap_err();
        assert!(matches!(
            err,
            Error::Registry(RegistryError::DuplicateOption { .. })
        ));
    }

    #[test]
    fn test_failed_register_adds_nothing() {
        let mut registry = OptionRegistry::merge([group("first", &["a"])]).unwrap();

        let result = registry.register(group("second", &["b", "a"]));

        assert!(result.is_err());
        assert!(!registry.contains("b"));
        assert_eq!(registry.groups(), vec!["first"]);
    }

    #[test]
    fn test_default_must_pass_validator() {
        let bad = OptionGroup::new("training", GroupScope::Training).with(
            OptionDescriptor::new("epochs", "")
                .with_default(json!(0))
                .with_validator(crate::Validator::int_min(1)),
        );
        assert!(matches!(
            OptionRegistry::validate(&bad),
            Err(Error::InvalidValue { .. })
        ));
    }
}
