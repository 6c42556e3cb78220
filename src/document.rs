// document.rs - The single writing session

use crate::clock::{Timestamp, truncate_to_seconds};
use unicode_segmentation::UnicodeSegmentation;

/// Text of the current session plus when it started and last changed.
///
/// `start_time` is set by the first accepted mutation after creation or a
/// clear and stays fixed until the next clear. `end_time` is never set
/// without `start_time`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    text: String,
    start_time: Option<Timestamp>,
    end_time: Option<Timestamp>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a document from persisted parts. An end time without a start
    /// time is dropped.
    pub fn restore(
        text: impl Into<String>,
        start_time: Option<Timestamp>,
        end_time: Option<Timestamp>,
    ) -> Self {
        let end_time = start_time.and(end_time.or(start_time));
        Self {
            text: text.into(),
            start_time,
            end_time,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start_time(&self) -> Option<Timestamp> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<Timestamp> {
        self.end_time
    }

    pub fn is_started(&self) -> bool {
        self.start_time.is_some()
    }

    /// Candidate state with `text` replacing the current text, committed at `now`.
    pub fn with_text(&self, text: impl Into<String>, now: Timestamp) -> Document {
        let now = truncate_to_seconds(now);
        Document {
            text: text.into(),
            start_time: self.start_time.or(Some(now)),
            end_time: Some(now),
        }
    }

    pub fn appended(&self, addition: &str, now: Timestamp) -> Document {
        let mut text = String::with_capacity(self.text.len() + addition.len());
        text.push_str(&self.text);
        text.push_str(addition);
        self.with_text(text, now)
    }

    /// Candidate with the last grapheme cluster removed, or `None` when empty.
    pub fn backspaced(&self, now: Timestamp) -> Option<Document> {
        let (idx, _) = self.text.grapheme_indices(true).next_back()?;
        Some(self.with_text(&self.text[..idx], now))
    }

    pub fn word_count(&self) -> usize {
        crate::export::word_count(&self.text)
    }
}
