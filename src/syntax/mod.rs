// syntax/mod.rs - Markdown highlighting

pub mod highlighter;

pub use highlighter::{HighlightError, MAX_HIGHLIGHT_BYTES, escape_html, highlight_markdown};
