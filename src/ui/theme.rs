// ui/theme.rs - Named color themes for the writing surface

use std::fmt;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use thiserror::Error;

use crate::plugin::Tone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ThemeName {
    #[default]
    Default,
    Mauve,
    NightMode,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown theme '{0}' (expected one of: default, mauve, night-mode)")]
pub struct UnknownTheme(pub String);

impl ThemeName {
    pub const ALL: [ThemeName; 3] = [ThemeName::Default, ThemeName::Mauve, ThemeName::NightMode];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeName::Default => "default",
            ThemeName::Mauve => "mauve",
            ThemeName::NightMode => "night-mode",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeName::Default => "Default",
            ThemeName::Mauve => "Mauve",
            ThemeName::NightMode => "Night Mode",
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

/// Resolved colors for one theme
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    pub general: GeneralTheme,
    pub markup: MarkupTheme,
    pub ui: UiTheme,
}

#[derive(Debug, Clone)]
pub struct GeneralTheme {
    pub background: Color,
    pub foreground: Color,
    pub placeholder: Color,
}

/// Colors for highlighter classes
#[derive(Debug, Clone)]
pub struct MarkupTheme {
    pub section: Color,
    pub quote: Color,
    pub code: Color,
    pub link: Color,
    pub bullet: Color,
    pub tag: Color,
}

#[derive(Debug, Clone)]
pub struct UiTheme {
    pub toolbar_bg: Color,
    pub toolbar_fg: Color,
    pub status_fg: Color,
    pub timer_active: Color,
    pub timer_expired: Color,
    pub modal_border: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::named(ThemeName::Default)
    }
}

impl Theme {
    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self {
                name,
                general: GeneralTheme {
                    background: Color::Reset,
                    foreground: Color::Rgb(230, 230, 230),
                    placeholder: Color::DarkGray,
                },
                markup: MarkupTheme {
                    section: Color::Rgb(97, 175, 239),
                    quote: Color::Rgb(152, 195, 121),
                    code: Color::Rgb(229, 192, 123),
                    link: Color::Rgb(86, 182, 194),
                    bullet: Color::Rgb(198, 120, 221),
                    tag: Color::Rgb(224, 108, 117),
                },
                ui: UiTheme {
                    toolbar_bg: Color::Rgb(40, 44, 52),
                    toolbar_fg: Color::Gray,
                    status_fg: Color::Yellow,
                    timer_active: Color::Green,
                    timer_expired: Color::Red,
                    modal_border: Color::Blue,
                    selection_bg: Color::Blue,
                    selection_fg: Color::White,
                },
            },
            ThemeName::Mauve => Self {
                name,
                general: GeneralTheme {
                    background: Color::Rgb(45, 33, 46),
                    foreground: Color::Rgb(240, 220, 235),
                    placeholder: Color::Rgb(140, 110, 135),
                },
                markup: MarkupTheme {
                    section: Color::Rgb(224, 176, 255),
                    quote: Color::Rgb(190, 160, 200),
                    code: Color::Rgb(255, 200, 170),
                    link: Color::Rgb(170, 200, 255),
                    bullet: Color::Rgb(255, 150, 200),
                    tag: Color::Rgb(255, 130, 160),
                },
                ui: UiTheme {
                    toolbar_bg: Color::Rgb(70, 50, 72),
                    toolbar_fg: Color::Rgb(230, 200, 225),
                    status_fg: Color::Rgb(255, 200, 170),
                    timer_active: Color::Rgb(200, 240, 190),
                    timer_expired: Color::Rgb(255, 130, 160),
                    modal_border: Color::Rgb(224, 176, 255),
                    selection_bg: Color::Rgb(120, 80, 125),
                    selection_fg: Color::White,
                },
            },
            ThemeName::NightMode => Self {
                name,
                general: GeneralTheme {
                    background: Color::Rgb(12, 12, 16),
                    foreground: Color::Rgb(160, 160, 170),
                    placeholder: Color::Rgb(70, 70, 80),
                },
                markup: MarkupTheme {
                    section: Color::Rgb(120, 140, 200),
                    quote: Color::Rgb(110, 140, 110),
                    code: Color::Rgb(170, 150, 100),
                    link: Color::Rgb(100, 150, 160),
                    bullet: Color::Rgb(150, 110, 160),
                    tag: Color::Rgb(170, 100, 100),
                },
                ui: UiTheme {
                    toolbar_bg: Color::Rgb(24, 24, 30),
                    toolbar_fg: Color::Rgb(110, 110, 120),
                    status_fg: Color::Rgb(170, 150, 100),
                    timer_active: Color::Rgb(110, 150, 110),
                    timer_expired: Color::Rgb(170, 90, 90),
                    modal_border: Color::Rgb(80, 80, 100),
                    selection_bg: Color::Rgb(40, 40, 60),
                    selection_fg: Color::Rgb(200, 200, 210),
                },
            },
        }
    }

    pub fn text_style(&self) -> Style {
        Style::default()
            .fg(self.general.foreground)
            .bg(self.general.background)
    }

    /// Style for a highlighter class such as `hljs-section`
    pub fn markup_style(&self, class: &str) -> Style {
        let base = Style::default().fg(self.general.foreground);
        match class.strip_prefix("hljs-").unwrap_or(class) {
            "section" => base.fg(self.markup.section).add_modifier(Modifier::BOLD),
            "quote" => base.fg(self.markup.quote).add_modifier(Modifier::ITALIC),
            "code" => base.fg(self.markup.code),
            "emphasis" => base.add_modifier(Modifier::ITALIC),
            "strong" => base.add_modifier(Modifier::BOLD),
            "link" => base.fg(self.markup.link).add_modifier(Modifier::UNDERLINED),
            "bullet" => base.fg(self.markup.bullet),
            "tag" => base.fg(self.markup.tag),
            _ => base,
        }
    }

    pub fn tone_style(&self, tone: Tone) -> Style {
        let base = Style::default()
            .fg(self.ui.toolbar_fg)
            .bg(self.ui.toolbar_bg);
        match tone {
            Tone::Normal => base,
            Tone::Active => base.fg(self.ui.timer_active),
            Tone::Expired => base
                .fg(self.ui.timer_expired)
                .add_modifier(Modifier::BOLD),
        }
    }
}
