// ui/widgets/settings.rs - Plugin settings modal

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::editor::Editor;
use crate::ui::theme::Theme;

/// Every plugin's settings section; the selected row is highlighted.
pub struct SettingsPanel<'a> {
    pub editor: &'a Editor,
    pub theme: &'a Theme,
}

impl<'a> SettingsPanel<'a> {
    pub fn new(editor: &'a Editor, theme: &'a Theme) -> Self {
        Self { editor, theme }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let text = Style::default().fg(self.theme.general.foreground);
        let muted = Style::default().fg(self.theme.general.placeholder);
        let selected = Style::default()
            .bg(self.theme.ui.selection_bg)
            .fg(self.theme.ui.selection_fg);
        let row_style = |row: usize| {
            if row == self.editor.settings_selected {
                selected
            } else {
                text
            }
        };

        let mut lines = Vec::new();
        let mut row = 0;
        for (_, view) in self.editor.settings_views() {
            lines.push(Line::from(Span::styled(
                view.title,
                text.add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(format!("  {}", view.description), muted)));
            if let Some(enabled) = view.enabled {
                let mark = if enabled { "[x]" } else { "[ ]" };
                lines.push(Line::from(Span::styled(
                    format!("  {} Enabled", mark),
                    row_style(row),
                )));
                row += 1;
            }
            if let Some(choice) = view.choice {
                let current = choice
                    .selected
                    .and_then(|i| choice.options.get(i))
                    .map(|option| option.label.clone())
                    .unwrap_or_else(|| "-".to_string());
                lines.push(Line::from(Span::styled(
                    format!("  {}: < {} >", choice.label, current.trim()),
                    row_style(row),
                )));
                row += 1;
            }
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            "↑↓ select  Enter/←→ change  Esc close",
            muted,
        )));
        lines
    }
}

/// `width` x `height` rectangle centered in `area`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

impl Widget for SettingsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        let popup = centered(area, 56, lines.len() as u16 + 2);
        Clear.render(popup, buf);
        let block = Block::default()
            .title(" Settings ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.ui.modal_border))
            .style(self.theme.text_style());
        Paragraph::new(lines).block(block).render(popup, buf);
    }
}
