// syntax/highlighter.rs - Markdown classification into span markup

use log::trace;
use pulldown_cmark::{Event, Parser, Tag};
use std::ops::Range;
use thiserror::Error;

/// Larger inputs are rejected instead of stalling the redraw.
pub const MAX_HIGHLIGHT_BYTES: usize = 256 * 1024;

/// Class wrapped around the whole highlighted document
pub const ROOT_CLASS: &str = "hljs";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HighlightError {
    #[error("text too large to highlight ({len} bytes, limit {limit})")]
    TooLarge { len: usize, limit: usize },
}

/// How much of an element's source range gets its class
enum Extent {
    Whole,
    /// Only the leading marker (`-`, `*`, `1.`) of a list item
    Marker,
}

fn classify(event: &Event<'_>) -> Option<(&'static str, Extent)> {
    match event {
        Event::Start(Tag::Heading { .. }) => Some(("hljs-section", Extent::Whole)),
        Event::Start(Tag::BlockQuote(..)) => Some(("hljs-quote", Extent::Whole)),
        Event::Start(Tag::CodeBlock(..)) => Some(("hljs-code", Extent::Whole)),
        Event::Start(Tag::Emphasis) => Some(("hljs-emphasis", Extent::Whole)),
        Event::Start(Tag::Strong) => Some(("hljs-strong", Extent::Whole)),
        Event::Start(Tag::Link { .. }) => Some(("hljs-link", Extent::Whole)),
        Event::Start(Tag::Image { .. }) => Some(("hljs-link", Extent::Whole)),
        Event::Start(Tag::Item) => Some(("hljs-bullet", Extent::Marker)),
        Event::Code(..) => Some(("hljs-code", Extent::Whole)),
        Event::Rule => Some(("hljs-section", Extent::Whole)),
        Event::Html(..) | Event::InlineHtml(..) => Some(("hljs-tag", Extent::Whole)),
        _ => None,
    }
}

/// Per-byte class of `text`. Nested elements come later in the event stream
/// and overwrite their parents, so the innermost class wins.
fn byte_classes(text: &str) -> Vec<Option<&'static str>> {
    let mut classes = vec![None; text.len()];
    let parser = Parser::new(text).into_offset_iter();

    for (event, range) in parser {
        let Some((class, extent)) = classify(&event) else {
            continue;
        };
        let Range { start, end } = range;
        let end = end.min(text.len());
        match extent {
            Extent::Whole => classes[start..end].fill(Some(class)),
            Extent::Marker => {
                let bytes = text.as_bytes();
                let mut i = start;
                while i < end && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                while i < end && !bytes[i].is_ascii_whitespace() {
                    classes[i] = Some(class);
                    i += 1;
                }
            }
        }
    }
    classes
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Highlight `text` as markdown, producing escaped markup of the form
/// `<span class="hljs">...<span class="hljs-section"># Title</span>...</span>`.
///
/// Every character of the input appears in the output exactly once (after
/// escaping); highlighting only adds spans.
pub fn highlight_markdown(text: &str) -> Result<String, HighlightError> {
    if text.len() > MAX_HIGHLIGHT_BYTES {
        return Err(HighlightError::TooLarge {
            len: text.len(),
            limit: MAX_HIGHLIGHT_BYTES,
        });
    }

    let classes = byte_classes(text);
    let mut out = format!("<span class=\"{ROOT_CLASS}\">");
    let mut run_start = 0;
    let mut run_class = None;
    let mut spans = 0;

    let mut flush = |out: &mut String, range: Range<usize>, class: Option<&str>| {
        if range.is_empty() {
            return;
        }
        let escaped = escape_html(&text[range]);
        match class {
            Some(class) => {
                spans += 1;
                out.push_str(&format!("<span class=\"{class}\">{escaped}</span>"));
            }
            None => out.push_str(&escaped),
        }
    };

    for (idx, _) in text.char_indices() {
        let class = classes[idx];
        if class != run_class {
            flush(&mut out, run_start..idx, run_class);
            run_start = idx;
            run_class = class;
        }
    }
    flush(&mut out, run_start..text.len(), run_class);
    out.push_str("</span>");

    trace!("highlighted {} bytes into {} spans", text.len(), spans);
    Ok(out)
}
