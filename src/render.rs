// render.rs - Derives presentable content from committed text

use crate::event_bus::{EventBus, RenderText};

/// Payload of the `render:text` channel.
///
/// When `is_html` is set, `content` is markup produced by a trusted plugin
/// and is interpreted by the display instead of being shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPayload {
    pub content: String,
    pub is_html: bool,
}

impl RenderPayload {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            content: text.into(),
            is_html: false,
        }
    }

    pub fn markup(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_html: true,
        }
    }
}

/// Run `raw` through every render subscriber. Each one sees the previous
/// one's output, so the result depends on subscription order.
pub fn render_text(bus: &EventBus, raw: &str) -> RenderPayload {
    bus.publish::<RenderText>(RenderPayload::plain(raw))
}
