// A timed session from first keystroke to lockout

mod common;

use chrono::TimeDelta;
use common::Session;
use serde_json::json;
use writeonly::clock::{Clock, parse_timestamp};
use writeonly::editor::EditorOptions;
use writeonly::plugin::{Slot, SlotView, Tone};
use writeonly::plugins::pomodoro;
use writeonly::storage::{MemoryStorage, keys};

fn toolbar(session: &Session) -> Vec<(String, Tone)> {
    session
        .editor
        .slot_views(Slot::Toolbar)
        .into_iter()
        .filter_map(|(_, view)| match view {
            SlotView::Text { text, tone } => Some((text, tone)),
            SlotView::Settings(_) => None,
        })
        .collect()
}

fn timed_session() -> Session {
    let options = EditorOptions {
        plugin_preset: Some(
            json!({ "pomodoroTimer": { "enabled": true, "duration": 1_500_000 } }).to_string(),
        ),
        ..EditorOptions::default()
    };
    // Half a second past the minute, so commit times are truncated.
    Session::with_storage(
        Box::new(MemoryStorage::new()),
        options,
        "2024-03-01T09:30:00.500+00:00",
    )
}

#[test]
fn timer_counts_down_and_then_locks_input() {
    let mut session = timed_session();
    assert_eq!(toolbar(&session)[0].0, "⏱️ 25:00");

    session.type_text("H");
    assert_eq!(session.editor.doc.text(), "H");
    assert_eq!(toolbar(&session)[0].0, "⏱️ 24:59");

    session.clock.advance(TimeDelta::seconds(24 * 60 + 54));
    assert_eq!(toolbar(&session)[0], ("⏱️ 0:05".to_string(), Tone::Active));
    session.type_text("i");
    assert_eq!(session.editor.doc.text(), "Hi");

    session
        .clock
        .set(parse_timestamp("2024-03-01T09:55:02+00:00").unwrap());
    assert_eq!(
        toolbar(&session)[0],
        ("⏰ Session Complete".to_string(), Tone::Expired)
    );
    session.type_text("!");
    assert_eq!(session.editor.doc.text(), "Hi");
    assert_eq!(
        session.editor.status_message.as_deref(),
        Some(pomodoro::COMPLETE_REASON)
    );

    // Backspace is a mutation too.
    session
        .editor
        .execute_command(writeonly::command::Command::DeleteChar);
    assert_eq!(session.editor.doc.text(), "Hi");
}

#[test]
fn changing_duration_keeps_session_start() {
    let mut session = timed_session();
    session.type_text("draft");
    let start = session.editor.doc.start_time();
    session.clock.advance(TimeDelta::minutes(12));

    session
        .editor
        .update_plugin_config(pomodoro::KEY, pomodoro::duration_patch(15));
    assert_eq!(session.editor.doc.start_time(), start);
    assert_eq!(toolbar(&session)[0].0, "⏱️ 2:59");

    session
        .editor
        .update_plugin_config(pomodoro::KEY, pomodoro::duration_patch(10));
    session.type_text("more");
    assert_eq!(session.editor.doc.text(), "draft");
}

#[test]
fn disabling_timer_lifts_the_lock() {
    let mut session = timed_session();
    session.type_text("a");
    session.clock.advance(TimeDelta::minutes(30));
    session.type_text("b");
    assert_eq!(session.editor.doc.text(), "a");

    session.editor.set_plugin_enabled(pomodoro::KEY, false);
    session.type_text("b");
    assert_eq!(session.editor.doc.text(), "ab");
    assert!(toolbar(&session).iter().all(|(text, _)| !text.contains('⏱')));
    assert!(session.editor.doc.end_time().unwrap() > session.editor.doc.start_time().unwrap());
    assert_eq!(
        session.editor.doc.end_time().unwrap(),
        session.clock.now() - TimeDelta::milliseconds(500)
    );
}

#[test]
fn stored_start_ahead_of_clock_does_not_break_the_timer() {
    let storage = MemoryStorage::with_entries([
        (keys::TEXT, "from the future"),
        (keys::START_TIME, "2024-03-01T10:00:00+00:00"),
    ]);
    let options = EditorOptions {
        plugin_preset: Some(
            json!({ "pomodoroTimer": { "enabled": true, "duration": i64::MAX } }).to_string(),
        ),
        ..EditorOptions::default()
    };
    let mut session = Session::with_storage(Box::new(storage), options, common::T0);
    assert!(session.editor.registry.is_active(pomodoro::KEY));

    let items = toolbar(&session);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].0, "⏱️ 153722867280912:55");
    assert_eq!(items[0].1, Tone::Active);

    session.type_text("!");
    assert_eq!(session.editor.doc.text(), "from the future!");
}
