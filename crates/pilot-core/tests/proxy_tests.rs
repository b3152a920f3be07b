//! Integration tests for the settings proxy

use pilot_core::{
    Error, MainSettings, MemorySink, ProxyError, Settings, SettingsProxy, Verbosity,
};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TrainingSettings {
    learning_rate: f64,
    epochs: u32,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            learning_rate: 1e-4,
            epochs: 1,
        }
    }
}

impl Settings for TrainingSettings {
    fn validate(&self) -> Result<(), String> {
        if self.epochs == 0 {
            return Err("epochs must be at least 1".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
struct DataSettings {
    batch_size: u32,
    shuffle: bool,
}

impl Settings for DataSettings {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
struct ClashingSettings {
    shuffle: bool,
}

impl Settings for ClashingSettings {}

#[test]
fn test_fields_resolve_across_blocks() {
    let mut proxy = SettingsProxy::new();
    proxy.add_settings(TrainingSettings::default()).unwrap();
    proxy.add_settings(DataSettings::default()).unwrap();

    proxy.set("batch_size", 32).unwrap();
    proxy.set("learning_rate", 1e-3).unwrap();

    assert_eq!(proxy.get("batch_size").unwrap(), json!(32));
    assert_eq!(proxy.get("learning_rate").unwrap(), json!(1e-3));
    assert_eq!(
        proxy.settings::<TrainingSettings>().unwrap().learning_rate,
        1e-3
    );
    assert_eq!(proxy.names(), vec!["TrainingSettings", "DataSettings"]);
}

#[test]
fn test_duplicate_block_is_rejected() {
    let mut proxy = SettingsProxy::new();
    proxy.add_settings(TrainingSettings::default()).unwrap();

    let err = proxy.add_settings(TrainingSettings::default()).unwrap_err();

    assert!(matches!(
        err,
        Error::Proxy(ProxyError::DuplicateSettings { ref name }) if name == "TrainingSettings"
    ));
}

#[test]
fn test_field_collision_is_eager() {
    let mut proxy = SettingsProxy::new();
    proxy.add_settings(DataSettings::default()).unwrap();

    let err = proxy.add_settings(ClashingSettings::default()).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Field 'shuffle' of model 'ClashingSettings' already exists in model 'DataSettings'."
    );
    assert!(proxy.settings::<ClashingSettings>().is_none());
}

#[test]
fn test_unknown_fields_fall_back_to_attributes() {
    let mut proxy = SettingsProxy::new();
    proxy.add_settings(TrainingSettings::default()).unwrap();

    assert!(matches!(
        proxy.get("notes"),
        Err(Error::Proxy(ProxyError::UnknownField { .. }))
    ));

    proxy.set("notes", "first try").unwrap();

    assert_eq!(proxy.get("notes").unwrap(), json!("first try"));
}

#[test]
fn test_block_validation_runs_on_set() {
    let mut proxy = SettingsProxy::new();
    proxy.add_settings(TrainingSettings::default()).unwrap();

    let err = proxy.set("epochs", 0).unwrap_err();

    assert!(matches!(
        err,
        Error::Proxy(ProxyError::InvalidValue { ref field, .. }) if field == "epochs"
    ));
    assert_eq!(proxy.get("epochs").unwrap(), json!(1));
}

#[test]
fn test_freeze_blocks_all_writes() {
    let mut proxy = SettingsProxy::new();
    proxy.add_settings(TrainingSettings::default()).unwrap();
    proxy.freeze();

    assert!(matches!(
        proxy.set("epochs", 3),
        Err(Error::Proxy(ProxyError::Frozen { .. }))
    ));
    assert!(proxy.set("notes", "x").is_err());
    assert!(proxy.add_settings(DataSettings::default()).is_err());
    assert!(matches!(
        proxy.set_model("vae"),
        Err(Error::Proxy(ProxyError::Frozen { ref target })) if target == "model"
    ));
    assert_eq!(proxy.model(), None);

    proxy.unfreeze();
    proxy.set("epochs", 3).unwrap();
    assert_eq!(proxy.get("epochs").unwrap(), json!(3));
}

#[test]
fn test_main_settings_acquire_sink() {
    let temp = TempDir::new().unwrap();
    let sink = MemorySink::new();
    let mut proxy = SettingsProxy::new().with_sink_factory(sink.factory());

    proxy
        .add_settings(MainSettings {
            verbosity: Verbosity::Debug,
            output_area: Some(temp.path().to_path_buf()),
            project_name: "Calo".into(),
        })
        .unwrap();

    assert!(proxy.sink().is_some());
    assert_eq!(sink.messages(Verbosity::Info), vec!["Calo settings ready."]);
    assert_eq!(proxy.get("verbosity").unwrap(), json!("DEBUG"));

    let _ = proxy.get("missing");
    assert_eq!(sink.messages(Verbosity::Error).len(), 1);
}

#[test]
fn test_main_settings_reject_missing_output_area() {
    let temp = TempDir::new().unwrap();
    let mut proxy = SettingsProxy::new();
    proxy.add_settings(MainSettings::default()).unwrap();

    let missing = temp.path().join("nope");
    assert!(proxy.set("output_area", missing.to_string_lossy()).is_err());

    proxy
        .set("output_area", temp.path().to_string_lossy())
        .unwrap();
    assert_eq!(
        proxy.settings::<MainSettings>().unwrap().output_area.as_deref(),
        Some(temp.path())
    );
}

#[test]
fn test_model_slot() {
    let mut proxy = SettingsProxy::new();
    assert_eq!(proxy.model(), None);

    proxy.set_model("vae").unwrap();

    assert_eq!(proxy.model(), Some("vae"));
}
