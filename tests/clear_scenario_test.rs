// Clearing a session resets the document, storage and plugin state

mod common;

use chrono::TimeDelta;
use common::Session;
use serde_json::json;
use writeonly::clock::Clock;
use writeonly::command::Command;
use writeonly::mode::Mode;
use writeonly::plugin::{Slot, SlotView};
use writeonly::storage::keys;
use writeonly::storage::{FileStorage, Storage};

fn clear(session: &mut Session) {
    session.editor.execute_command(Command::RequestClear);
    assert_eq!(session.editor.mode, Mode::ConfirmClear);
    session.editor.execute_command(Command::ConfirmClear);
}

#[test]
fn clear_resets_times_and_storage() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    let mut session = Session::with_storage(
        Box::new(FileStorage::open(&path).unwrap()),
        Default::default(),
        common::T0,
    );
    session.type_text("first session");
    session.clock.advance(TimeDelta::minutes(3));
    clear(&mut session);

    assert_eq!(session.editor.doc.text(), "");
    assert_eq!(session.editor.doc.start_time(), None);
    assert_eq!(session.editor.doc.end_time(), None);

    let on_disk = FileStorage::open(&path).unwrap();
    for key in [keys::TEXT, keys::START_TIME, keys::END_TIME] {
        assert!(on_disk.get(key).is_none(), "{key} should be removed");
    }

    session.type_text("n");
    let restarted = session.editor.doc.start_time().unwrap();
    assert_eq!(restarted, session.clock.now());
}

#[test]
fn clear_restarts_an_expired_timer() {
    let mut session = Session::with_plugins(json!({
        "pomodoroTimer": { "enabled": true, "duration": 300_000 }
    }));
    session.type_text("a");
    session.clock.advance(TimeDelta::minutes(6));
    session.type_text("b");
    assert_eq!(session.editor.doc.text(), "a");

    clear(&mut session);
    session.type_text("fresh");
    assert_eq!(session.editor.doc.text(), "fresh");

    let toolbar: Vec<String> = session
        .editor
        .slot_views(Slot::Toolbar)
        .into_iter()
        .filter_map(|(_, view)| match view {
            SlotView::Text { text, .. } => Some(text),
            SlotView::Settings(_) => None,
        })
        .collect();
    assert_eq!(toolbar, vec!["⏱️ 5:00".to_string()]);
}

#[test]
fn disabled_timer_leftovers_do_not_survive_clear() {
    let mut session = Session::with_plugins(json!({
        "pomodoroTimer": { "enabled": true, "duration": 300_000 }
    }));
    session.type_text("old");
    session
        .editor
        .set_plugin_enabled(writeonly::plugins::pomodoro::KEY, false);
    session.clock.advance(TimeDelta::minutes(10));
    clear(&mut session);

    session
        .editor
        .set_plugin_enabled(writeonly::plugins::pomodoro::KEY, true);
    session.type_text("new");
    assert_eq!(session.editor.doc.text(), "new");
}

#[test]
fn clear_can_skip_confirmation() {
    let options = writeonly::editor::EditorOptions {
        confirm_clear: false,
        ..Default::default()
    };
    let mut session = Session::with_storage(
        Box::new(writeonly::storage::MemoryStorage::new()),
        options,
        common::T0,
    );
    session.type_text("gone");
    session.editor.execute_command(Command::RequestClear);
    assert_eq!(session.editor.mode, Mode::Writing);
    assert_eq!(session.editor.doc.text(), "");
}
