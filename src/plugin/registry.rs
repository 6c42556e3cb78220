// plugin/registry.rs - Plugin catalog and the lifecycle of enabled instances

use std::collections::HashMap;

use crate::clock::Timestamp;
use crate::event_bus::EventBus;
use crate::plugin::{
    Capability, ConfigStore, InitContext, Plugin, PluginConfig, PluginDescriptor, PluginError,
    PluginInstance, PluginState, Slot, SlotProps, SlotView,
};

/// Owns the plugin catalog (in registration order) and one instance per
/// enabled plugin.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
    instances: HashMap<&'static str, Box<dyn PluginInstance>>,
    states: HashMap<&'static str, PluginState>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> Result<(), PluginError> {
        let key = plugin.descriptor().key;
        if self.find(key).is_some() {
            return Err(PluginError::DuplicateKey(key.to_string()));
        }
        self.plugins.push(plugin);
        self.states.insert(key, PluginState::Disabled);
        Ok(())
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.plugins.iter().map(|p| p.descriptor())
    }

    pub fn descriptor(&self, key: &str) -> Option<&PluginDescriptor> {
        self.find(key).map(|p| p.descriptor())
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.descriptors().map(|d| d.key).collect()
    }

    pub fn state(&self, key: &str) -> Option<PluginState> {
        self.states.get(key).copied()
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.state(key) == Some(PluginState::Active)
    }

    /// Active plugin keys in registry order
    pub fn active_keys(&self) -> Vec<&'static str> {
        self.descriptors()
            .map(|d| d.key)
            .filter(|key| self.is_active(key))
            .collect()
    }

    fn find(&self, key: &str) -> Option<&dyn Plugin> {
        self.plugins
            .iter()
            .find(|p| p.descriptor().key == key)
            .map(|p| p.as_ref())
    }

    /// Create and initialize an instance of `key`. An already active plugin
    /// is cleaned up first.
    pub fn initialize_plugin(
        &mut self,
        key: &str,
        bus: &mut EventBus,
        config: &PluginConfig,
        ctx: &InitContext,
    ) -> Result<(), PluginError> {
        let plugin = self
            .find(key)
            .ok_or_else(|| PluginError::UnknownPlugin(key.to_string()))?;
        let key = plugin.descriptor().key;
        let mut instance = plugin.instantiate();

        if self.instances.contains_key(key) {
            self.cleanup_plugin(key, bus);
        }

        self.states.insert(key, PluginState::Initializing);
        match instance.initialize(bus, config, ctx) {
            Ok(()) => {
                self.instances.insert(key, instance);
                self.states.insert(key, PluginState::Active);
                log::debug!("plugin {} active", key);
                Ok(())
            }
            Err(e) => {
                // Undo whatever the instance managed to subscribe before failing.
                instance.cleanup(bus);
                self.states.insert(key, PluginState::Disabled);
                Err(e)
            }
        }
    }

    pub fn cleanup_plugin(&mut self, key: &str, bus: &mut EventBus) {
        let Some((key, mut instance)) = self.instances.remove_entry(key) else {
            return;
        };
        self.states.insert(key, PluginState::CleaningUp);
        instance.cleanup(bus);
        self.states.insert(key, PluginState::Disabled);
        log::debug!("plugin {} disabled", key);
    }

    /// Stop-the-world rebuild: clean up every instance, clear the bus, then
    /// initialize every enabled plugin in registry order.
    ///
    /// Returns the plugins that failed to initialize; they stay disabled.
    pub fn reinitialize(
        &mut self,
        bus: &mut EventBus,
        config: &ConfigStore,
        ctx: &InitContext,
    ) -> Vec<(&'static str, PluginError)> {
        for key in self.keys() {
            self.cleanup_plugin(key, bus);
        }
        bus.clear();

        let mut failures = Vec::new();
        for key in self.keys() {
            let Some(descriptor) = self.descriptor(key) else {
                continue;
            };
            let effective = config.effective(descriptor);
            if !effective.enabled {
                continue;
            }
            if let Err(e) = self.initialize_plugin(key, bus, &effective, ctx) {
                log::error!("failed to initialize plugin {}: {}", key, e);
                failures.push((key, e));
            }
        }
        failures
    }

    /// Clean up every instance, e.g. on shutdown.
    pub fn shutdown(&mut self, bus: &mut EventBus) {
        for key in self.keys() {
            self.cleanup_plugin(key, bus);
        }
    }

    /// Give every active ticker a chance to fire. Returns whether any did.
    pub fn poll_ticks(&mut self, now: Timestamp) -> bool {
        let mut fired = false;
        for plugin in &self.plugins {
            let descriptor = plugin.descriptor();
            if !descriptor.has(Capability::PeriodicTicker) {
                continue;
            }
            if let Some(instance) = self.instances.get_mut(descriptor.key) {
                fired |= instance.poll_tick(now);
            }
        }
        fired
    }

    /// Everything plugins contribute to `slot`, in registry order.
    ///
    /// Settings come from the catalog for every plugin declaring them;
    /// toolbar and status views only from active instances.
    pub fn slot_views(
        &self,
        slot: Slot,
        config: &ConfigStore,
        props: &SlotProps<'_>,
    ) -> Vec<(&'static str, SlotView)> {
        let mut views = Vec::new();
        for plugin in &self.plugins {
            let descriptor = plugin.descriptor();
            if !descriptor.has(slot.capability()) {
                continue;
            }
            let view = match slot {
                Slot::Settings => plugin
                    .settings_view(&config.effective(descriptor), props)
                    .map(SlotView::Settings),
                Slot::Toolbar | Slot::Status => self
                    .instances
                    .get(descriptor.key)
                    .and_then(|instance| instance.slot_view(slot, props)),
            };
            if let Some(view) = view {
                views.push((descriptor.key, view));
            }
        }
        views
    }
}
