// plugin/mod.rs - Plugin descriptors, capabilities and the instance contract

pub mod config;
pub mod registry;

use std::rc::Rc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::clock::{Clock, Timestamp};
use crate::document::Document;
use crate::event_bus::EventBus;
use crate::ui::theme::ThemeName;

pub use config::{ConfigStore, PluginConfig};
pub use registry::PluginRegistry;

/// What a plugin takes part in. The registry only dispatches to declared
/// capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    RenderSubscriber,
    ValidationSubscriber,
    PeriodicTicker,
    SettingsUi,
    ToolbarUi,
    StatusUi,
}

/// Named UI extension point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Toolbar,
    Settings,
    Status,
}

impl Slot {
    pub fn capability(self) -> Capability {
        match self {
            Slot::Toolbar => Capability::ToolbarUi,
            Slot::Settings => Capability::SettingsUi,
            Slot::Status => Capability::StatusUi,
        }
    }
}

/// Lifecycle of one plugin. There is no `Active -> Active` transition; a
/// config change for an active plugin goes through a full cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PluginState {
    #[default]
    Disabled,
    Initializing,
    Active,
    CleaningUp,
}

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin key '{0}' is already registered")]
    DuplicateKey(String),
    #[error("unknown plugin '{0}'")]
    UnknownPlugin(String),
    #[error("plugin '{key}' has an invalid '{option}' option: {message}")]
    InvalidOption {
        key: &'static str,
        option: &'static str,
        message: String,
    },
}

/// Static description of a plugin; the set of keys is the registry's identity.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Options merged under a missing or partial config entry
    pub default_config: Map<String, Value>,
    pub capabilities: Vec<Capability>,
}

impl PluginDescriptor {
    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn slots(&self) -> Vec<Slot> {
        [Slot::Toolbar, Slot::Settings, Slot::Status]
            .into_iter()
            .filter(|slot| self.has(slot.capability()))
            .collect()
    }
}

/// Notification from a ticking plugin that its display should refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickEvent {
    pub plugin: &'static str,
    pub at: Timestamp,
}

pub type TickObserver = Rc<dyn Fn(&TickEvent)>;

/// What a plugin sees when it is initialized
#[derive(Clone)]
pub struct InitContext {
    /// Snapshot of the committed document
    pub doc: Document,
    pub clock: Rc<dyn Clock>,
    pub observer: Option<TickObserver>,
}

/// Ambient data handed to slot renderers
#[derive(Debug, Clone, Copy)]
pub struct SlotProps<'a> {
    pub doc: &'a Document,
    pub now: Timestamp,
    pub theme: ThemeName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Active,
    Expired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub label: String,
    pub value: Value,
}

/// A pick-one option shown in the settings panel; picking writes `value`
/// into the plugin's config under `field`.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingChoice {
    pub label: &'static str,
    pub field: &'static str,
    pub options: Vec<ChoiceOption>,
    pub selected: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsView {
    pub title: &'static str,
    pub description: &'static str,
    /// `None` for plugins that cannot be switched off
    pub enabled: Option<bool>,
    pub choice: Option<SettingChoice>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotView {
    Text { text: String, tone: Tone },
    Settings(SettingsView),
}

/// A catalog entry: describes a plugin and creates its runtime instances.
pub trait Plugin {
    fn descriptor(&self) -> &PluginDescriptor;

    /// Fresh instance for a disabled -> enabled transition.
    fn instantiate(&self) -> Box<dyn PluginInstance>;

    /// Settings slot. Rendered for enabled and disabled plugins alike so the
    /// panel can switch them on.
    fn settings_view(&self, _config: &PluginConfig, _props: &SlotProps<'_>) -> Option<SettingsView> {
        None
    }
}

/// Runtime state of an enabled plugin.
///
/// `cleanup` must undo every subscription made by `initialize` and cancel
/// any schedule the instance owns.
pub trait PluginInstance {
    fn initialize(
        &mut self,
        bus: &mut EventBus,
        config: &PluginConfig,
        ctx: &InitContext,
    ) -> Result<(), PluginError>;

    fn cleanup(&mut self, bus: &mut EventBus);

    /// Fire the periodic callback if it is due. Returns whether it fired.
    fn poll_tick(&mut self, _now: Timestamp) -> bool {
        false
    }

    /// Toolbar and status slots
    fn slot_view(&self, _slot: Slot, _props: &SlotProps<'_>) -> Option<SlotView> {
        None
    }
}

/// Instance for plugins that only contribute settings
#[derive(Debug, Default)]
pub struct Inert;

impl PluginInstance for Inert {
    fn initialize(
        &mut self,
        _bus: &mut EventBus,
        _config: &PluginConfig,
        _ctx: &InitContext,
    ) -> Result<(), PluginError> {
        Ok(())
    }

    fn cleanup(&mut self, _bus: &mut EventBus) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_follow_capabilities() {
        let descriptor = PluginDescriptor {
            key: "recorder",
            name: "Recorder",
            description: "",
            default_config: Map::new(),
            capabilities: vec![Capability::ValidationSubscriber, Capability::ToolbarUi],
        };
        assert_eq!(descriptor.slots(), vec![Slot::Toolbar]);
        assert!(!descriptor.has(Capability::PeriodicTicker));
    }
}
