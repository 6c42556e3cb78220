// ui/widgets/editor_pane.rs - Tail-following text pane

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::editor::Editor;
use crate::ui::markup::{StyledLine, StyledRun, styled_lines};
use crate::ui::theme::Theme;

/// Break styled lines into rows of at most `width` display columns.
pub fn wrap_lines(lines: &[StyledLine], width: usize) -> Vec<StyledLine> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for line in lines {
        let mut row: StyledLine = Vec::new();
        let mut used = 0;
        for run in line {
            let mut piece = String::new();
            for ch in run.text.chars() {
                let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);
                if used > 0 && used + ch_width > width {
                    if !piece.is_empty() {
                        row.push(StyledRun {
                            text: std::mem::take(&mut piece),
                            class: run.class.clone(),
                        });
                    }
                    rows.push(std::mem::take(&mut row));
                    used = 0;
                }
                piece.push(ch);
                used += ch_width;
            }
            if !piece.is_empty() {
                row.push(StyledRun {
                    text: piece,
                    class: run.class.clone(),
                });
            }
        }
        rows.push(row);
    }
    rows
}

/// Where the cursor sits after drawing `rows` into `area`: the end of the
/// last visible row.
pub fn cursor_position(rows: &[StyledLine], area: Rect) -> (u16, u16) {
    let visible = rows.len().min(area.height as usize).max(1);
    let last_width: usize = rows
        .last()
        .map(|row| row.iter().map(|run| UnicodeWidthStr::width(run.text.as_str())).sum())
        .unwrap_or(0);
    let col = last_width.min(area.width.saturating_sub(1) as usize) as u16;
    (area.x + col, area.y + visible as u16 - 1)
}

/// The session text, scrolled so the end is always in view
pub struct EditorPane<'a> {
    pub editor: &'a Editor,
    pub theme: &'a Theme,
}

impl<'a> EditorPane<'a> {
    pub fn new(editor: &'a Editor, theme: &'a Theme) -> Self {
        Self { editor, theme }
    }

    pub fn rows(&self, width: u16) -> Vec<StyledLine> {
        wrap_lines(&styled_lines(&self.editor.rendered), width as usize)
    }
}

impl Widget for EditorPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let background = Style::default().bg(self.theme.general.background);
        for y in 0..area.height {
            for x in 0..area.width {
                buf.get_mut(area.x + x, area.y + y)
                    .set_char(' ')
                    .set_style(background);
            }
        }

        let rows = self.rows(area.width);
        let skip = rows.len().saturating_sub(area.height as usize);
        for (i, row) in rows.iter().skip(skip).enumerate() {
            let spans: Vec<Span> = row
                .iter()
                .map(|run| {
                    let style = match &run.class {
                        Some(class) => self.theme.markup_style(class),
                        None => Style::default().fg(self.theme.general.foreground),
                    };
                    Span::styled(run.text.as_str(), style.bg(self.theme.general.background))
                })
                .collect();
            buf.set_line(area.x, area.y + i as u16, &Line::from(spans), area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> StyledLine {
        vec![StyledRun {
            text: text.to_string(),
            class: None,
        }]
    }

    #[test]
    fn test_wrap_splits_long_lines() {
        let rows = wrap_lines(&[plain("abcdefg"), vec![]], 3);
        let text: Vec<String> = rows
            .iter()
            .map(|row| row.iter().map(|r| r.text.as_str()).collect())
            .collect();
        assert_eq!(text, vec!["abc", "def", "g", ""]);
    }

    #[test]
    fn test_wrap_keeps_classes_across_rows() {
        let line = vec![
            StyledRun {
                text: "ab".to_string(),
                class: None,
            },
            StyledRun {
                text: "cd".to_string(),
                class: Some("hljs-strong".to_string()),
            },
        ];
        let rows = wrap_lines(&[line], 3);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0].text, "d");
        assert_eq!(rows[1][0].class.as_deref(), Some("hljs-strong"));
    }

    #[test]
    fn test_cursor_follows_tail() {
        let area = Rect::new(2, 1, 10, 3);
        let rows = wrap_lines(&[plain("one"), plain("two"), plain("three"), plain("fo")], 10);
        assert_eq!(cursor_position(&rows, area), (4, 3));
        assert_eq!(cursor_position(&[], area), (2, 1));
    }

    #[test]
    fn test_wide_characters_use_two_columns() {
        let rows = wrap_lines(&[plain("你好世界")], 5);
        let text: Vec<String> = rows
            .iter()
            .map(|row| row.iter().map(|r| r.text.as_str()).collect())
            .collect();
        assert_eq!(text, vec!["你好", "世界"]);
        assert_eq!(cursor_position(&rows, Rect::new(0, 0, 10, 4)), (4, 1));
    }

    #[test]
    fn test_combining_marks_do_not_wrap() {
        let rows = wrap_lines(&[plain("cafe\u{301}")], 4);
        assert_eq!(rows.len(), 1);
        assert_eq!(cursor_position(&rows, Rect::new(0, 0, 10, 2)), (4, 0));
    }
}
