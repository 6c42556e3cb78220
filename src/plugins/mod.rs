// plugins/mod.rs - Built-in plugins

pub mod pomodoro;
pub mod syntax_highlighting;
pub mod theme_selector;

use crate::plugin::PluginRegistry;

pub use pomodoro::PomodoroTimer;
pub use syntax_highlighting::SyntaxHighlighting;
pub use theme_selector::ThemeSelector;

/// Registry holding the core plugins in their fixed order
pub fn core_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    let plugins: [Box<dyn crate::plugin::Plugin>; 3] = [
        Box::new(SyntaxHighlighting::new()),
        Box::new(PomodoroTimer::new()),
        Box::new(ThemeSelector::new()),
    ];
    for plugin in plugins {
        // Keys are distinct constants.
        if let Err(e) = registry.register(plugin) {
            log::error!("{}", e);
        }
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_registry_order() {
        let registry = core_registry();
        assert_eq!(
            registry.keys(),
            vec![
                syntax_highlighting::KEY,
                pomodoro::KEY,
                theme_selector::KEY
            ]
        );
        assert!(registry.active_keys().is_empty());
    }
}
