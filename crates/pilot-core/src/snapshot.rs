//! Configuration snapshots
//!
//! A snapshot is the flat map of every registered option plus the reserved
//! `_model_name` key. It is written once when a run freezes and can be fed
//! back into the next run as its configuration file.

use crate::Result;
use pilot_fs::checksum::compute_content_checksum;
use pilot_fs::{ConfigStore, NormalizedPath};
use pilot_meta::OptionValue;
use pilot_meta::constants::MODEL_NAME_KEY;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub values: BTreeMap<String, OptionValue>,
    pub model_name: Option<String>,
}

/// What a snapshot write produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotReceipt {
    pub path: NormalizedPath,
    pub checksum: String,
}

impl Snapshot {
    pub fn new(values: BTreeMap<String, OptionValue>, model_name: Option<String>) -> Self {
        Self { values, model_name }
    }

    /// Flat map as persisted, including the reserved model key.
    pub fn to_map(&self) -> BTreeMap<String, OptionValue> {
        let mut map = self.values.clone();
        map.insert(
            MODEL_NAME_KEY.to_string(),
            self.model_name
                .clone()
                .map(OptionValue::String)
                .unwrap_or(OptionValue::Null),
        );
        map
    }

    /// Split a persisted map into option values and the model name.
    pub fn from_map(mut map: BTreeMap<String, OptionValue>) -> Self {
        let model_name = match map.remove(MODEL_NAME_KEY) {
            Some(OptionValue::String(name)) if !name.is_empty() => Some(name),
            _ => None,
        };
        Self {
            values: map,
            model_name,
        }
    }

    /// Load a snapshot or any configuration file of the same shape.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let map: BTreeMap<String, OptionValue> = ConfigStore::new().load(path)?;
        Ok(Self::from_map(map))
    }

    /// Write atomically in the format implied by the extension.
    ///
    /// TOML has no null, so unset entries are left out of `.toml` files;
    /// a missing key loads back as its default.
    pub fn write(&self, path: &NormalizedPath) -> Result<SnapshotReceipt> {
        let mut map = self.to_map();
        if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("toml")) {
            map.retain(|_, v| !v.is_null());
        }
        let content = ConfigStore::new().save(path, &map)?;
        Ok(SnapshotReceipt {
            path: path.clone(),
            checksum: compute_content_checksum(&content),
        })
    }
}
