// ui/renderer.rs - Ratatui-based renderer for the writing surface

use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
};
use std::io::Stdout;

use crate::editor::Editor;
use crate::mode::Mode;
use crate::ui::theme::Theme;
use crate::ui::widgets::confirm::ConfirmClear;
use crate::ui::widgets::editor_pane::{EditorPane, cursor_position};
use crate::ui::widgets::settings::SettingsPanel;
use crate::ui::widgets::status_bar::{StatusBar, Toolbar};

/// Ratatui-based renderer
pub struct TuiRenderer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    theme: Theme,
}

impl TuiRenderer {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let backend = CrosstermBackend::new(std::io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            theme: Theme::default(),
        })
    }

    /// Draw the editor UI
    pub fn draw(&mut self, editor: &Editor) -> Result<(), Box<dyn std::error::Error>> {
        if self.theme.name != editor.theme {
            self.theme = Theme::named(editor.theme);
        }
        let theme = &self.theme;

        self.terminal.draw(|f| {
            let size = f.size();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(1),    // Text
                    Constraint::Length(1), // Toolbar
                    Constraint::Length(1), // Status line
                ])
                .split(size);

            let pane = EditorPane::new(editor, theme);
            let rows = pane.rows(chunks[0].width);
            f.render_widget(pane, chunks[0]);
            f.render_widget(Toolbar::new(editor, theme), chunks[1]);
            f.render_widget(StatusBar::new(editor, theme), chunks[2]);

            match editor.mode {
                Mode::Writing => {
                    let (x, y) = cursor_position(&rows, chunks[0]);
                    f.set_cursor(x, y);
                }
                Mode::ConfirmClear => f.render_widget(ConfirmClear::new(theme), size),
                Mode::Settings => f.render_widget(SettingsPanel::new(editor, theme), size),
            }
        })?;
        Ok(())
    }
}
