// keymap.rs - Key events to commands, per mode

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::command::Command;
use crate::mode::Mode;

fn global(key_event: &KeyEvent) -> Option<Command> {
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key_event.modifiers.contains(KeyModifiers::SHIFT);
    match key_event.code {
        KeyCode::F(2) => Some(Command::OpenSettings),
        KeyCode::Char(',') if ctrl => Some(Command::OpenSettings),
        KeyCode::Char('q') if ctrl => Some(Command::Quit),
        KeyCode::Char('s') if ctrl => Some(Command::ExportFile),
        // Enhanced terminals report Ctrl+Shift+X as 'X' or as 'x' with SHIFT.
        // Legacy ones send the same byte for Ctrl+X and Ctrl+Shift+X.
        KeyCode::Char('X') | KeyCode::Char('x') if ctrl => Some(Command::RequestClear),
        KeyCode::Char('c') if ctrl && !shift => Some(Command::Copy),
        _ => None,
    }
}

/// Map a key press to a command. Releases and repeats of modified keys are ignored.
pub fn key_to_command(key_event: KeyEvent, mode: Mode) -> Option<Command> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key_event.modifiers.contains(KeyModifiers::ALT);

    match mode {
        Mode::Writing => global(&key_event).or_else(|| match key_event.code {
            KeyCode::Char(c) if !ctrl && !alt => Some(Command::InsertChar(c)),
            KeyCode::Enter => Some(Command::InsertChar('\n')),
            KeyCode::Tab => Some(Command::InsertChar('\t')),
            KeyCode::Backspace => Some(Command::DeleteChar),
            _ => None,
        }),
        Mode::ConfirmClear => match key_event.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(Command::ConfirmClear),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Command::CancelClear),
            KeyCode::Char('q') if ctrl => Some(Command::Quit),
            _ => None,
        },
        Mode::Settings => match key_event.code {
            KeyCode::Esc | KeyCode::F(2) => Some(Command::CloseSettings),
            KeyCode::Char(',') if ctrl => Some(Command::CloseSettings),
            KeyCode::Char('q') if ctrl => Some(Command::Quit),
            KeyCode::Up | KeyCode::Char('k') => Some(Command::SettingsUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Command::SettingsDown),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Command::SettingsActivate),
            KeyCode::Right | KeyCode::Char('l') => Some(Command::SettingsNext),
            KeyCode::Left | KeyCode::Char('h') => Some(Command::SettingsPrev),
            _ => None,
        },
    }
}
