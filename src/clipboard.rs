// clipboard.rs - Clipboard sinks for the copy action

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Platform does not support clipboard operations")]
    UnsupportedPlatform,
    #[error("System error: {0}")]
    SystemError(String),
}

/// Where copied session text goes
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The desktop clipboard
#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self> {
        match arboard::Clipboard::new() {
            Ok(clipboard) => Ok(Self { inner: clipboard }),
            Err(e) => Err(ClipboardError::SystemError(e.to_string()).into()),
        }
    }
}

#[cfg(feature = "clipboard")]
impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text)
            .map_err(|e| anyhow::anyhow!("Failed to set clipboard text: {}", e))
    }
}

/// Stand-in when no clipboard is available; every copy fails.
#[derive(Debug, Default)]
pub struct Unsupported;

impl ClipboardSink for Unsupported {
    fn set_text(&mut self, _text: &str) -> Result<()> {
        Err(ClipboardError::UnsupportedPlatform.into())
    }
}

/// In-process clipboard; clones share contents.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

/// Best clipboard for this build and platform
pub fn system_clipboard() -> Box<dyn ClipboardSink> {
    #[cfg(feature = "clipboard")]
    {
        match SystemClipboard::new() {
            Ok(clipboard) => return Box::new(clipboard),
            Err(e) => log::warn!("clipboard unavailable: {}", e),
        }
    }
    Box::new(Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_shares_contents() {
        let clipboard = MemoryClipboard::new();
        let mut sink: Box<dyn ClipboardSink> = Box::new(clipboard.clone());
        sink.set_text("copied").unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("copied"));
    }

    #[test]
    fn test_unsupported_reports_error() {
        let err = Unsupported.set_text("x").unwrap_err();
        assert_eq!(err.to_string(), "Platform does not support clipboard operations");
    }
}
