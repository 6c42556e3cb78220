// plugin/config.rs - Per-plugin enabled flag and options

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::plugin::PluginDescriptor;
use crate::storage::{Storage, StorageError, keys};

/// `{ "enabled": bool, ...options }` for one plugin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl PluginConfig {
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    pub fn option_u64(&self, name: &str) -> Option<u64> {
        self.options.get(name).and_then(Value::as_u64)
    }

    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.options.get(name).and_then(Value::as_str)
    }

    fn to_map(&self) -> Map<String, Value> {
        let mut map = self.options.clone();
        map.insert("enabled".to_string(), Value::Bool(self.enabled));
        map
    }

    fn from_map(mut map: Map<String, Value>) -> Self {
        let enabled = map
            .remove("enabled")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        Self {
            enabled,
            options: map,
        }
    }
}

/// Plugin key -> config. A missing entry means `{ enabled: false }` plus the
/// plugin's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    entries: BTreeMap<String, PluginConfig>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let entries: BTreeMap<String, PluginConfig> = serde_json::from_str(raw)?;
        Ok(Self { entries })
    }

    /// Load from a preset (takes precedence) or from storage. Anything that
    /// does not parse yields an empty configuration.
    pub fn load(storage: &dyn Storage, preset: Option<&str>) -> Self {
        let (source, raw) = match preset {
            Some(raw) => ("preset", Some(raw.to_string())),
            None => ("storage", storage.get(keys::PLUGIN_CONFIG)),
        };
        let Some(raw) = raw else {
            return Self::new();
        };
        match Self::parse(&raw) {
            Ok(store) => {
                log::debug!("loaded plugin config from {} ({} entries)", source, store.len());
                store
            }
            Err(e) => {
                log::warn!("ignoring malformed plugin config from {}: {}", source, e);
                Self::new()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&PluginConfig> {
        self.entries.get(key)
    }

    pub fn is_enabled(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|c| c.enabled)
    }

    /// Stored entry merged over the descriptor's defaults
    pub fn effective(&self, descriptor: &PluginDescriptor) -> PluginConfig {
        let mut options = descriptor.default_config.clone();
        let enabled = match self.entries.get(descriptor.key) {
            Some(stored) => {
                options.extend(stored.options.clone());
                stored.enabled
            }
            None => false,
        };
        PluginConfig { enabled, options }
    }

    /// Shallow-merge `patch` over the current entry for `key`.
    pub fn update(&mut self, key: &str, patch: Map<String, Value>) {
        let mut merged = self
            .entries
            .get(key)
            .map(PluginConfig::to_map)
            .unwrap_or_default();
        merged.extend(patch);
        self.entries
            .insert(key.to_string(), PluginConfig::from_map(merged));
    }

    pub fn set_enabled(&mut self, key: &str, enabled: bool) {
        let mut patch = Map::new();
        patch.insert("enabled".to_string(), Value::Bool(enabled));
        self.update(key, patch);
    }

    /// Write to storage. An empty configuration removes the entry so that
    /// defaults look the same as never having opened the settings.
    pub fn persist(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        if self.entries.is_empty() {
            return storage.remove(keys::PLUGIN_CONFIG);
        }
        let json = self.to_json()?;
        storage.set(keys::PLUGIN_CONFIG, &json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn descriptor() -> PluginDescriptor {
        let mut defaults = Map::new();
        defaults.insert("duration".to_string(), json!(1500000));
        PluginDescriptor {
            key: "pomodoroTimer",
            name: "Pomodoro Timer",
            description: "",
            default_config: defaults,
            capabilities: vec![],
        }
    }

    fn patch(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_missing_entry_is_disabled_defaults() {
        let store = ConfigStore::new();
        let config = store.effective(&descriptor());
        assert!(!config.enabled);
        assert_eq!(config.option_u64("duration"), Some(1500000));
    }

    #[test]
    fn test_stored_options_override_defaults() {
        let store =
            ConfigStore::parse(r#"{"pomodoroTimer":{"enabled":true,"duration":300000}}"#).unwrap();
        let config = store.effective(&descriptor());
        assert!(config.enabled);
        assert_eq!(config.option_u64("duration"), Some(300000));
    }

    #[test]
    fn test_update_is_shallow_merge() {
        let mut store = ConfigStore::new();
        store.update("pomodoroTimer", patch(json!({"enabled": true, "duration": 600000})));
        store.update("pomodoroTimer", patch(json!({"duration": 900000})));

        let entry = store.get("pomodoroTimer").unwrap();
        assert!(entry.enabled);
        assert_eq!(entry.option_u64("duration"), Some(900000));
    }

    #[test]
    fn test_persist_removes_entry_when_empty() {
        let mut storage = MemoryStorage::with_entries([(keys::PLUGIN_CONFIG, "{}")]);
        ConfigStore::new().persist(&mut storage).unwrap();
        assert!(storage.get(keys::PLUGIN_CONFIG).is_none());

        let mut store = ConfigStore::new();
        store.set_enabled("syntaxHighlighting", true);
        store.persist(&mut storage).unwrap();
        let raw = storage.get(keys::PLUGIN_CONFIG).unwrap();
        assert_eq!(ConfigStore::parse(&raw).unwrap(), store);
    }

    #[test]
    fn test_malformed_config_falls_back_to_empty() {
        let storage = MemoryStorage::with_entries([(keys::PLUGIN_CONFIG, "{enabled")]);
        assert!(ConfigStore::load(&storage, None).is_empty());
        assert!(ConfigStore::load(&MemoryStorage::new(), Some("[1, 2")).is_empty());
    }

    #[test]
    fn test_preset_takes_precedence() {
        let storage = MemoryStorage::with_entries([(
            keys::PLUGIN_CONFIG,
            r#"{"syntaxHighlighting":{"enabled":true}}"#,
        )]);
        let store = ConfigStore::load(&storage, Some(r#"{"pomodoroTimer":{"enabled":true}}"#));
        assert!(store.is_enabled("pomodoroTimer"));
        assert!(!store.is_enabled("syntaxHighlighting"));
    }
}
