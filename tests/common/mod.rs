// Common test utilities for driving a full editor session

use std::rc::Rc;

use serde_json::Value;
use writeonly::clipboard::MemoryClipboard;
use writeonly::clock::ManualClock;
use writeonly::command::Command;
use writeonly::editor::{Editor, EditorOptions};
use writeonly::storage::{MemoryStorage, Storage};

pub const T0: &str = "2024-03-01T09:30:00+00:00";

/// An editor wired to a manual clock and an in-memory clipboard
pub struct Session {
    pub editor: Editor,
    pub clock: ManualClock,
    pub clipboard: MemoryClipboard,
}

impl Session {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::with_storage(Box::new(MemoryStorage::new()), EditorOptions::default(), T0)
    }

    #[allow(dead_code)]
    pub fn with_plugins(preset: Value) -> Self {
        let options = EditorOptions {
            plugin_preset: Some(preset.to_string()),
            ..EditorOptions::default()
        };
        Self::with_storage(Box::new(MemoryStorage::new()), options, T0)
    }

    pub fn with_storage(storage: Box<dyn Storage>, options: EditorOptions, start: &str) -> Self {
        let clock = ManualClock::starting_at(start);
        let clipboard = MemoryClipboard::new();
        let editor = Editor::new(
            storage,
            Rc::new(clock.clone()),
            Box::new(clipboard.clone()),
            options,
        );
        Self {
            editor,
            clock,
            clipboard,
        }
    }

    /// Feed `text` one key at a time, as the keymap would.
    #[allow(dead_code)]
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.editor.execute_command(Command::InsertChar(c));
        }
    }
}
