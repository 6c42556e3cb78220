// plugins/syntax_highlighting.rs - Markdown highlighting on the render channel

use std::rc::Rc;

use log::warn;
use serde_json::Map;

use crate::event_bus::{EventBus, Handler, RenderText};
use crate::plugin::{
    Capability, InitContext, Plugin, PluginConfig, PluginDescriptor, PluginError, PluginInstance,
    SettingsView, SlotProps,
};
use crate::render::RenderPayload;
use crate::syntax::highlight_markdown;

pub const KEY: &str = "syntaxHighlighting";

pub struct SyntaxHighlighting {
    descriptor: PluginDescriptor,
}

impl SyntaxHighlighting {
    pub fn new() -> Self {
        Self {
            descriptor: PluginDescriptor {
                key: KEY,
                name: "Syntax Highlighting",
                description: "Adds markdown syntax coloring to the text",
                default_config: Map::new(),
                capabilities: vec![Capability::RenderSubscriber, Capability::SettingsUi],
            },
        }
    }
}

impl Default for SyntaxHighlighting {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for SyntaxHighlighting {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn instantiate(&self) -> Box<dyn PluginInstance> {
        Box::new(HighlightingInstance::default())
    }

    fn settings_view(&self, config: &PluginConfig, _props: &SlotProps<'_>) -> Option<SettingsView> {
        Some(SettingsView {
            title: self.descriptor.name,
            description: "Adds markdown syntax highlighting",
            enabled: Some(config.enabled),
            choice: None,
        })
    }
}

/// Replaces the current content with highlighted markup. A highlighter
/// failure passes the payload through untouched.
pub fn highlight_handler() -> Handler<RenderPayload> {
    Rc::new(|payload: RenderPayload| match highlight_markdown(&payload.content) {
        Ok(markup) => RenderPayload::markup(markup),
        Err(e) => {
            warn!("syntax highlighting skipped: {}", e);
            payload
        }
    })
}

#[derive(Default)]
struct HighlightingInstance {
    handler: Option<Handler<RenderPayload>>,
}

impl PluginInstance for HighlightingInstance {
    fn initialize(
        &mut self,
        bus: &mut EventBus,
        _config: &PluginConfig,
        _ctx: &InitContext,
    ) -> Result<(), PluginError> {
        let handler = highlight_handler();
        bus.subscribe::<RenderText>(&handler);
        self.handler = Some(handler);
        Ok(())
    }

    fn cleanup(&mut self, bus: &mut EventBus) {
        if let Some(handler) = self.handler.take() {
            bus.unsubscribe::<RenderText>(&handler);
        }
    }
}
