use crossterm::{
    event::{
        Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags, read,
    },
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;
use writeonly::clipboard::system_clipboard;
use writeonly::clock::SystemClock;
use writeonly::config::AppConfig;
use writeonly::editor::{Editor, EditorOptions};
use writeonly::keymap::key_to_command;
use writeonly::storage::{FileStorage, MemoryStorage, Storage};
use writeonly::ui::renderer::TuiRenderer;
use writeonly::ui::theme::ThemeName;
use writeonly::{cli, paths};

const STORAGE_FILE: &str = "storage.json";
const LOG_FILE: &str = "writeonly.log";
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Log to a file in the data directory so the alternate screen stays clean.
/// Falls back to stderr when the file cannot be opened.
fn init_logging(data_dir: Option<&Path>) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Info)
        .parse_default_env();

    let log_file = data_dir.and_then(|dir| {
        std::fs::create_dir_all(dir).ok()?;
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE))
            .ok()
    });
    if let Some(file) = log_file {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

fn open_storage(data_dir: Option<&Path>) -> Box<dyn Storage> {
    let Some(dir) = data_dir else {
        return Box::new(MemoryStorage::new());
    };
    match FileStorage::open(dir.join(STORAGE_FILE)) {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::error!("falling back to in-memory storage: {}", e);
            Box::new(MemoryStorage::new())
        }
    }
}

/// Application entry point: resolve flags and config, set up the terminal,
/// run the event loop, and restore the terminal on exit.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments first (before terminal setup)
    let cli_args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error parsing arguments: {}", e);
            std::process::exit(1);
        }
    };

    if cli_args.list_themes {
        println!("Available themes:");
        for theme in ThemeName::ALL {
            println!("  {}", theme);
        }
        return Ok(());
    }

    let app_config = match paths::find_config_file() {
        Some(path) => AppConfig::from_file(&path).unwrap_or_else(|e| {
            eprintln!("Warning: {} ({}), using defaults", e, path.display());
            AppConfig::default()
        }),
        None => AppConfig::default(),
    };

    let data_dir: Option<PathBuf> = if cli_args.ephemeral {
        None
    } else {
        Some(
            cli_args
                .data_dir
                .clone()
                .or_else(|| app_config.data_dir.clone())
                .unwrap_or_else(paths::get_data_dir),
        )
    };
    init_logging(data_dir.as_deref());

    let options = EditorOptions {
        theme_override: cli_args.theme,
        fallback_theme: app_config.theme_name().unwrap_or_default(),
        plugin_preset: cli_args.plugins.clone(),
        export_dir: data_dir.clone(),
        confirm_clear: app_config.confirm_clear,
    };
    let mut editor = Editor::new(
        open_storage(data_dir.as_deref()),
        Rc::new(SystemClock),
        system_clipboard(),
        options,
    );

    // Enable raw mode and enter alternate screen
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    // Reports Ctrl+Shift+X with its SHIFT modifier where supported
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        crossterm::execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }

    let result = run(&mut editor);

    editor.registry.shutdown(&mut editor.bus);
    if enhanced {
        crossterm::execute!(stdout, PopKeyboardEnhancementFlags)?;
    }
    crossterm::execute!(stdout, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    result
}

fn run(editor: &mut Editor) -> Result<(), Box<dyn std::error::Error>> {
    let mut renderer = TuiRenderer::new()?;
    let mut needs_redraw = true;

    loop {
        if needs_redraw {
            renderer.draw(editor)?;
            needs_redraw = false;
        }

        if crossterm::event::poll(POLL_INTERVAL)? {
            match read()? {
                Event::Key(key_event) => {
                    if let Some(cmd) = key_to_command(key_event, editor.mode) {
                        if editor.execute_command(cmd) {
                            break;
                        }
                        needs_redraw = true;
                    }
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }

        // Timer plugins refresh their display through the tick observer.
        if editor.poll_ticks() {
            needs_redraw = true;
        }
    }
    Ok(())
}
