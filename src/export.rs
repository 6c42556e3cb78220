// export.rs - Word count, share payload and export file naming

use std::sync::OnceLock;

use regex::Regex;

use crate::clock::{Timestamp, format_timestamp};
use crate::document::Document;

pub const EMPTY_TIME_DISPLAY: &str = "Just start typing.";

fn letter_runs() -> Option<&'static Regex> {
    static LETTER_RUNS: OnceLock<Option<Regex>> = OnceLock::new();
    LETTER_RUNS.get_or_init(|| Regex::new(r"\p{L}+").ok()).as_ref()
}

/// Number of runs of Unicode letters (general category L). Digits,
/// punctuation, symbols and letter-like numerals separate words without
/// counting as one.
pub fn word_count(text: &str) -> usize {
    letter_runs().map_or(0, |re| re.find_iter(text).count())
}

/// Compact id derived from a timestamp: `2024-03-01T09:30:00+01:00` -> `20240301093000`
pub fn zettel_id(at: &Timestamp) -> String {
    at.naive_local().format("%Y%m%d%H%M%S").to_string()
}

/// Text placed on the clipboard by the copy action
pub fn share_text(doc: &Document, copied_at: &Timestamp) -> String {
    let stamp = |at: Option<Timestamp>| at.as_ref().map(format_timestamp).unwrap_or_default();
    format!(
        "{}\n\nStarted at:: {}\nFinished at:: {}\nCopied at:: {}\nWord count:: {}",
        doc.text(),
        stamp(doc.start_time()),
        stamp(doc.end_time()),
        format_timestamp(copied_at),
        doc.word_count()
    )
}

/// `{zettel_id}.txt`, or `None` while the session has not started
pub fn export_file_name(doc: &Document) -> Option<String> {
    doc.start_time().map(|start| format!("{}.txt", zettel_id(&start)))
}

pub fn time_display(doc: &Document) -> String {
    match (doc.start_time(), doc.end_time()) {
        (Some(start), Some(end)) => format!("{} -> {}", zettel_id(&start), zettel_id(&end)),
        (Some(start), None) => zettel_id(&start),
        _ => EMPTY_TIME_DISPLAY.to_string(),
    }
}
