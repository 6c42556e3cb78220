// ui/widgets/status_bar.rs - Toolbar and status line widgets

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::editor::Editor;
use crate::export::time_display;
use crate::plugin::{Slot, SlotView, Tone};
use crate::ui::theme::Theme;

const HINTS: &str = "^C copy  ^S export  ^X clear  F2 settings  ^Q quit";

/// Session times, plugin toolbar items and the word count
pub struct Toolbar<'a> {
    pub editor: &'a Editor,
    pub theme: &'a Theme,
}

impl<'a> Toolbar<'a> {
    pub fn new(editor: &'a Editor, theme: &'a Theme) -> Self {
        Self { editor, theme }
    }

    /// Left-hand items in display order
    pub fn items(&self) -> Vec<(String, Tone)> {
        let mut items = vec![(time_display(&self.editor.doc), Tone::Normal)];
        for (_, view) in self.editor.slot_views(Slot::Toolbar) {
            if let SlotView::Text { text, tone } = view {
                items.push((text, tone));
            }
        }
        items
    }
}

impl Widget for Toolbar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let base = self.theme.tone_style(Tone::Normal);
        buf.set_style(area, base);

        let mut spans = vec![Span::styled(" ", base)];
        for (i, (text, tone)) in self.items().into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", base));
            }
            spans.push(Span::styled(text, self.theme.tone_style(tone)));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        let count = format!("{} words ", self.editor.doc.word_count());
        let width = count.chars().count() as u16;
        if width < area.width {
            buf.set_string(area.x + area.width - width, area.y, count, base);
        }
    }
}

/// Last status message (or key hints) with plugin status items on the right
pub struct StatusBar<'a> {
    pub editor: &'a Editor,
    pub theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(editor: &'a Editor, theme: &'a Theme) -> Self {
        Self { editor, theme }
    }

    /// Status-slot views from active plugins, in registry order
    pub fn plugin_items(&self) -> Vec<(String, Tone)> {
        self.editor
            .slot_views(Slot::Status)
            .into_iter()
            .filter_map(|(_, view)| match view {
                SlotView::Text { text, tone } => Some((text, tone)),
                SlotView::Settings(_) => None,
            })
            .collect()
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let background = Style::default().bg(self.theme.general.background);
        buf.set_style(area, background);

        let line = match &self.editor.status_message {
            Some(msg) => Line::from(format!(" {}", msg)).style(background.fg(self.theme.ui.status_fg)),
            None => Line::from(format!(" {}", HINTS)).style(background.fg(self.theme.general.placeholder)),
        };
        buf.set_line(area.x, area.y, &line, area.width);

        let mut spans = Vec::new();
        for (i, (text, tone)) in self.plugin_items().into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", background));
            }
            spans.push(Span::styled(text, self.theme.tone_style(tone)));
        }
        spans.push(Span::styled(" ", background));
        let right = Line::from(spans);
        let width = right.width() as u16;
        if width > 1 && width < area.width {
            buf.set_line(area.x + area.width - width, area.y, &right, width);
        }
    }
}
