// plugins/theme_selector.rs - Theme choice in the settings panel

use serde_json::{Map, Value, json};

use crate::plugin::{
    Capability, ChoiceOption, Inert, Plugin, PluginConfig, PluginDescriptor, PluginInstance,
    SettingChoice, SettingsView, SlotProps,
};
use crate::ui::theme::ThemeName;

pub const KEY: &str = "themeSelector";
pub const THEME_OPTION: &str = "theme";

pub struct ThemeSelector {
    descriptor: PluginDescriptor,
}

impl ThemeSelector {
    pub fn new() -> Self {
        Self {
            descriptor: PluginDescriptor {
                key: KEY,
                name: "Theme",
                description: "Choose your preferred visual theme",
                default_config: Map::new(),
                capabilities: vec![Capability::SettingsUi],
            },
        }
    }
}

impl Default for ThemeSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// Theme stored by the selector, if any and if it names a known theme
pub fn stored_theme(config: &PluginConfig) -> Option<ThemeName> {
    config.option_str(THEME_OPTION)?.parse().ok()
}

pub fn theme_patch(theme: ThemeName) -> Map<String, Value> {
    let mut patch = Map::new();
    patch.insert(THEME_OPTION.to_string(), json!(theme.as_str()));
    patch
}

impl Plugin for ThemeSelector {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn instantiate(&self) -> Box<dyn PluginInstance> {
        Box::new(Inert)
    }

    fn settings_view(&self, _config: &PluginConfig, props: &SlotProps<'_>) -> Option<SettingsView> {
        let options = ThemeName::ALL
            .iter()
            .map(|name| ChoiceOption {
                label: name.label().to_string(),
                value: json!(name.as_str()),
            })
            .collect();
        let selected = ThemeName::ALL.iter().position(|name| *name == props.theme);
        Some(SettingsView {
            title: self.descriptor.name,
            description: self.descriptor.description,
            enabled: None,
            choice: Some(SettingChoice {
                label: "Theme",
                field: THEME_OPTION,
                options,
                selected,
            }),
        })
    }
}
