// ui/markup.rs - Turn rendered span markup into styled terminal lines

use thiserror::Error;

use crate::render::RenderPayload;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkupError {
    #[error("unsupported tag at byte {0}")]
    UnsupportedTag(usize),
    #[error("unterminated {what} at byte {at}")]
    Unterminated { what: &'static str, at: usize },
    #[error("unknown entity '&{0};'")]
    UnknownEntity(String),
    #[error("closing tag without an open span at byte {0}")]
    UnbalancedClose(usize),
}

/// Text sharing one style. `class` is the innermost enclosing span class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub class: Option<String>,
}

pub type StyledLine = Vec<StyledRun>;

fn push_text(lines: &mut Vec<StyledLine>, text: &str, class: Option<&String>) {
    for (i, piece) in text.split('\n').enumerate() {
        if i > 0 {
            lines.push(Vec::new());
        }
        if piece.is_empty() {
            continue;
        }
        let Some(line) = lines.last_mut() else {
            continue;
        };
        match line.last_mut() {
            Some(run) if run.class.as_ref() == class => run.text.push_str(piece),
            _ => line.push(StyledRun {
                text: piece.to_string(),
                class: class.cloned(),
            }),
        }
    }
}

fn decode_entity(name: &str) -> Result<char, MarkupError> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" | "#39" => '\'',
        _ => {
            let code = name
                .strip_prefix("#x")
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()));
            return code
                .and_then(char::from_u32)
                .ok_or_else(|| MarkupError::UnknownEntity(name.to_string()));
        }
    };
    Ok(c)
}

/// Parse `<span class="..">` / `</span>` markup with HTML entities into lines.
pub fn parse_markup(markup: &str) -> Result<Vec<StyledLine>, MarkupError> {
    let mut lines: Vec<StyledLine> = vec![Vec::new()];
    let mut classes: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut rest = markup;
    let mut offset = 0;

    while let Some(c) = rest.chars().next() {
        match c {
            '<' => {
                push_text(&mut lines, &text, classes.last());
                text.clear();
                let end = rest.find('>').ok_or(MarkupError::Unterminated {
                    what: "tag",
                    at: offset,
                })?;
                let tag = &rest[1..end];
                if tag == "/span" {
                    classes.pop().ok_or(MarkupError::UnbalancedClose(offset))?;
                } else if let Some(class) = tag
                    .strip_prefix("span class=\"")
                    .and_then(|s| s.strip_suffix('"'))
                {
                    classes.push(class.to_string());
                } else {
                    return Err(MarkupError::UnsupportedTag(offset));
                }
                rest = &rest[end + 1..];
                offset += end + 1;
            }
            '&' => {
                let end = rest.find(';').ok_or(MarkupError::Unterminated {
                    what: "entity",
                    at: offset,
                })?;
                text.push(decode_entity(&rest[1..end])?);
                rest = &rest[end + 1..];
                offset += end + 1;
            }
            _ => {
                text.push(c);
                rest = &rest[c.len_utf8()..];
                offset += c.len_utf8();
            }
        }
    }
    push_text(&mut lines, &text, classes.last());
    Ok(lines)
}

/// Lines for the text pane. Markup the parser rejects is shown as plain text.
pub fn styled_lines(rendered: &RenderPayload) -> Vec<StyledLine> {
    if rendered.is_html {
        match parse_markup(&rendered.content) {
            Ok(lines) => return lines,
            Err(e) => log::warn!("showing rendered markup as plain text: {}", e),
        }
    }
    let mut lines = vec![Vec::new()];
    push_text(&mut lines, &rendered.content, None);
    lines
}
