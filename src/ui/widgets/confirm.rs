// ui/widgets/confirm.rs - Clear confirmation prompt

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::ui::theme::Theme;
use crate::ui::widgets::settings::centered;

pub struct ConfirmClear<'a> {
    pub theme: &'a Theme,
}

impl<'a> ConfirmClear<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for ConfirmClear<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered(area, 44, 5);
        Clear.render(popup, buf);
        let block = Block::default()
            .title(" Clear ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.ui.timer_expired))
            .style(self.theme.text_style());
        Paragraph::new("Clear all text and start a new session?\n[y] clear   [n] keep writing")
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(popup, buf);
    }
}
