//! Settings proxy
//!
//! An alternative to [`ConfigContext`](crate::ConfigContext) for callers
//! whose options come as independently validated typed blocks. Fields of
//! all blocks share one namespace: a field name may belong to only one
//! block, checked when the block is added.

use crate::logging::{LogSink, SinkFactory, Verbosity};
use crate::{ProxyError, Result};
use pilot_fs::NormalizedPath;
use pilot_meta::OptionValue;
use pilot_meta::constants::PROJECT_NAME;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Map;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A typed block of settings.
///
/// Field names are taken from the block's serialized form. `validate` runs
/// after every write on top of the type's own deserialization checks.
pub trait Settings: Serialize + DeserializeOwned + Send + Sync + 'static {
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// Settings every application carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MainSettings {
    pub verbosity: Verbosity,
    pub output_area: Option<PathBuf>,
    pub project_name: String,
}

impl Default for MainSettings {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Info,
            output_area: None,
            project_name: PROJECT_NAME.to_string(),
        }
    }
}

impl Settings for MainSettings {
    fn validate(&self) -> std::result::Result<(), String> {
        match &self.output_area {
            Some(dir) if !dir.is_dir() => Err(format!("'{}' is not a directory", dir.display())),
            _ => Ok(()),
        }
    }
}

/// Object-safe view of a registered block.
trait Block: Send + Sync {
    fn to_map(&self) -> Map<String, OptionValue>;
    fn replace(&mut self, name: &str, field: &str, value: OptionValue) -> Result<()>;
    fn as_any(&self) -> &dyn Any;
}

struct Typed<T>(T);

impl<T: Settings> Block for Typed<T> {
    fn to_map(&self) -> Map<String, OptionValue> {
        match serde_json::to_value(&self.0) {
            Ok(OptionValue::Object(map)) => map,
            _ => Map::new(),
        }
    }

    fn replace(&mut self, name: &str, field: &str, value: OptionValue) -> Result<()> {
        let invalid = |reason: String| ProxyError::InvalidValue {
            field: field.to_string(),
            settings: name.to_string(),
            reason,
        };
        let mut map = self.to_map();
        map.insert(field.to_string(), value);
        let updated: T =
            serde_json::from_value(OptionValue::Object(map)).map_err(|e| invalid(e.to_string()))?;
        updated.validate().map_err(invalid)?;
        self.0 = updated;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        &self.0
    }
}

struct Entry {
    name: String,
    fields: Vec<String>,
    block: Box<dyn Block>,
}

/// Aggregates settings blocks behind one field namespace.
///
/// # Example
///
/// ```
/// use pilot_core::{Settings, SettingsProxy};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Training {
///     epochs: u32,
/// }
///
/// impl Settings for Training {}
///
/// let mut proxy = SettingsProxy::new();
/// proxy.add_settings(Training { epochs: 1 })?;
/// proxy.set("epochs", 5)?;
/// assert_eq!(proxy.get("epochs")?, 5);
/// # Ok::<(), pilot_core::Error>(())
/// ```
#[derive(Default)]
pub struct SettingsProxy {
    entries: Vec<Entry>,
    attributes: BTreeMap<String, OptionValue>,
    frozen: bool,
    model: Option<String>,
    sink_factory: Option<SinkFactory>,
    sink: Option<Box<dyn LogSink>>,
}

impl fmt::Debug for SettingsProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsProxy")
            .field("settings", &self.names())
            .field("attributes", &self.attributes)
            .field("frozen", &self.frozen)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl SettingsProxy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a sink through `factory` once [`MainSettings`] are added.
    pub fn with_sink_factory(mut self, factory: SinkFactory) -> Self {
        self.sink_factory = Some(factory);
        self
    }

    /// Register a settings block.
    ///
    /// Fails if a block of the same type name is present or if one of its
    /// fields already belongs to another block.
    pub fn add_settings<T: Settings>(&mut self, settings: T) -> Result<()> {
        let name = short_type_name::<T>();
        if self.frozen {
            return Err(ProxyError::Frozen { target: name }.into());
        }
        if self.entries.iter().any(|e| e.name == name) {
            return Err(ProxyError::DuplicateSettings { name }.into());
        }

        let block = Typed(settings);
        let fields: Vec<String> = block.to_map().keys().cloned().collect();
        for entry in &self.entries {
            if let Some(field) = fields.iter().find(|f| entry.fields.contains(f)) {
                return Err(ProxyError::FieldCollision {
                    field: field.clone(),
                    settings: name,
                    existing: entry.name.clone(),
                }
                .into());
            }
        }

        let main = (&block.0 as &dyn Any).downcast_ref::<MainSettings>();
        if let (Some(main), Some(factory), None) = (main, &self.sink_factory, &self.sink) {
            let dir = main
                .output_area
                .as_deref()
                .map(NormalizedPath::new)
                .unwrap_or_else(|| NormalizedPath::new("."));
            let sink = factory(&dir, main.verbosity)?;
            sink.info(&format!("{} settings ready.", main.project_name));
            self.sink = Some(sink);
        }

        tracing::debug!(settings = %name, fields = fields.len(), "Added settings block");
        self.entries.push(Entry {
            name,
            fields,
            block: Box::new(block),
        });
        Ok(())
    }

    /// Value of `field`, looked up in registration order, then among the
    /// proxy's own attributes.
    pub fn get(&self, field: &str) -> Result<OptionValue> {
        if let Some(entry) = self.owner(field) {
            return Ok(entry
                .block
                .to_map()
                .remove(field)
                .unwrap_or(OptionValue::Null));
        }
        self.attributes
            .get(field)
            .cloned()
            .ok_or_else(|| self.fail(ProxyError::UnknownField {
                field: field.to_string(),
            }))
    }

    /// Write `field` in the block that owns it, or store it as an attribute
    /// of the proxy itself.
    pub fn set(&mut self, field: &str, value: impl Into<OptionValue>) -> Result<()> {
        if self.frozen {
            return Err(self.fail(ProxyError::Frozen {
                target: field.to_string(),
            }));
        }
        let value = value.into();
        let Some(index) = self
            .entries
            .iter()
            .position(|e| e.fields.iter().any(|f| f == field))
        else {
            self.attributes.insert(field.to_string(), value);
            return Ok(());
        };
        let entry = &mut self.entries[index];
        let result = entry.block.replace(&entry.name, field, value);
        if let (Err(e), Some(sink)) = (&result, &self.sink) {
            sink.error(&e.to_string());
        }
        result
    }

    /// The registered block of type `T`.
    pub fn settings<T: Settings>(&self) -> Option<&T> {
        self.entries
            .iter()
            .find_map(|e| e.block.as_any().downcast_ref::<T>())
    }

    /// Names of the registered blocks in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn set_model(&mut self, model: impl Into<String>) -> Result<()> {
        if self.frozen {
            return Err(self.fail(ProxyError::Frozen {
                target: "model".to_string(),
            }));
        }
        self.model = Some(model.into());
        Ok(())
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn sink(&self) -> Option<&dyn LogSink> {
        self.sink.as_deref()
    }

    fn owner(&self, field: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.fields.iter().any(|f| f == field))
    }

    fn fail(&self, error: ProxyError) -> crate::Error {
        if let Some(sink) = &self.sink {
            sink.error(&error.to_string());
        }
        error.into()
    }
}

fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Small {
        size: u8,
    }

    impl Settings for Small {}

    #[test]
    fn type_name_is_unqualified() {
        assert_eq!(short_type_name::<MainSettings>(), "MainSettings");
        assert_eq!(short_type_name::<Small>(), "Small");
    }

    #[test]
    fn typed_block_rejects_ill_typed_value() {
        let mut proxy = SettingsProxy::new();
        proxy.add_settings(Small { size: 1 }).unwrap();

        assert!(proxy.set("size", 300).is_err());
        assert!(proxy.set("size", "big").is_err());
        assert_eq!(proxy.settings::<Small>().map(|s| s.size), Some(1));
    }

    #[test]
    fn main_settings_defaults() {
        let main = MainSettings::default();
        assert_eq!(main.verbosity, Verbosity::Info);
        assert_eq!(main.project_name, "ML-Pilot");
        assert!(main.validate().is_ok());
    }
}
