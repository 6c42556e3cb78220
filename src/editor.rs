// src/editor.rs - Session controller: document, plugins and persistence

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::clipboard::ClipboardSink;
use crate::clock::{Clock, format_timestamp, parse_timestamp};
use crate::command::Command;
use crate::document::Document;
use crate::event_bus::EventBus;
use crate::export::{export_file_name, share_text};
use crate::mode::Mode;
use crate::plugin::{
    ConfigStore, InitContext, PluginRegistry, SettingChoice, SettingsView, Slot, SlotProps,
    SlotView, TickEvent, TickObserver,
};
use crate::plugins::{core_registry, theme_selector};
use crate::render::{RenderPayload, render_text};
use crate::storage::{Storage, keys};
use crate::ui::theme::ThemeName;
use crate::validate::validate_input;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export yet")]
    NotStarted,
    #[error("No export directory in ephemeral mode")]
    NoDirectory,
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Startup settings resolved from flags and the config file
#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// `--theme`; wins over everything else
    pub theme_override: Option<ThemeName>,
    /// Theme from the config file, used when the selector stored none
    pub fallback_theme: ThemeName,
    /// `--plugins`; replaces the stored plugin config for this run
    pub plugin_preset: Option<String>,
    pub export_dir: Option<PathBuf>,
    pub confirm_clear: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            theme_override: None,
            fallback_theme: ThemeName::Default,
            plugin_preset: None,
            export_dir: None,
            confirm_clear: true,
        }
    }
}

/// One navigable line in the settings panel
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsRow {
    Toggle {
        plugin: &'static str,
        enabled: bool,
    },
    Choice {
        plugin: &'static str,
        choice: SettingChoice,
    },
}

pub struct Editor {
    pub doc: Document,
    /// Render pipeline output for `doc`
    pub rendered: RenderPayload,
    pub bus: EventBus,
    pub registry: PluginRegistry,
    pub config: ConfigStore,
    pub mode: Mode,
    pub theme: ThemeName,
    pub status_message: Option<String>,
    pub settings_selected: usize,
    storage: Box<dyn Storage>,
    clock: Rc<dyn Clock>,
    clipboard: Box<dyn ClipboardSink>,
    redraw: Rc<Cell<bool>>,
    theme_override: Option<ThemeName>,
    fallback_theme: ThemeName,
    export_dir: Option<PathBuf>,
    confirm_clear: bool,
}

impl Editor {
    pub fn new(
        storage: Box<dyn Storage>,
        clock: Rc<dyn Clock>,
        clipboard: Box<dyn ClipboardSink>,
        options: EditorOptions,
    ) -> Self {
        let doc = load_document(storage.as_ref());
        let config = ConfigStore::load(storage.as_ref(), options.plugin_preset.as_deref());

        let mut editor = Self {
            doc,
            rendered: RenderPayload::plain(""),
            bus: EventBus::new(),
            registry: core_registry(),
            config,
            mode: Mode::Writing,
            theme: ThemeName::Default,
            status_message: None,
            settings_selected: 0,
            storage,
            clock,
            clipboard,
            redraw: Rc::new(Cell::new(false)),
            theme_override: options.theme_override,
            fallback_theme: options.fallback_theme,
            export_dir: options.export_dir,
            confirm_clear: options.confirm_clear,
        };
        editor.apply_config();
        editor
    }

    /// Returns true if should quit
    pub fn execute_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Quit => return true,
            Command::InsertChar(c) => {
                let mut buf = [0u8; 4];
                self.insert_text(c.encode_utf8(&mut buf));
            }
            Command::DeleteChar => {
                self.backspace();
            }
            Command::Copy => self.copy_text(),
            Command::ExportFile => match self.export_to_file() {
                Ok(path) => self.status_message = Some(format!("Exported to {}", path.display())),
                Err(e) => {
                    log::warn!("export failed: {}", e);
                    self.status_message = Some(e.to_string());
                }
            },
            Command::RequestClear => {
                if self.confirm_clear {
                    self.mode = Mode::ConfirmClear;
                } else {
                    self.clear();
                }
            }
            Command::ConfirmClear => {
                self.clear();
                self.mode = Mode::Writing;
            }
            Command::CancelClear => self.mode = Mode::Writing,
            Command::OpenSettings => {
                self.mode = Mode::Settings;
                self.settings_selected = 0;
            }
            Command::CloseSettings => self.mode = Mode::Writing,
            Command::SettingsUp => {
                self.settings_selected = self.settings_selected.saturating_sub(1);
            }
            Command::SettingsDown => {
                let last = self.settings_rows().len().saturating_sub(1);
                self.settings_selected = (self.settings_selected + 1).min(last);
            }
            Command::SettingsActivate | Command::SettingsNext => self.step_selected_setting(true),
            Command::SettingsPrev => self.step_selected_setting(false),
        }
        false
    }

    pub fn now(&self) -> crate::clock::Timestamp {
        self.clock.now()
    }

    pub fn insert_text(&mut self, text: &str) -> bool {
        let candidate = self.doc.appended(text, self.clock.now());
        self.try_commit(candidate)
    }

    pub fn backspace(&mut self) -> bool {
        match self.doc.backspaced(self.clock.now()) {
            Some(candidate) => self.try_commit(candidate),
            None => false,
        }
    }

    /// Run `candidate` through validation and commit it if allowed. A vetoed
    /// candidate is dropped whole and its reason becomes the status message.
    pub fn try_commit(&mut self, candidate: Document) -> bool {
        let outcome = validate_input(&self.bus, &candidate);
        if !outcome.allowed {
            log::debug!("input vetoed: {:?}", outcome.reason);
            self.status_message = outcome.reason;
            return false;
        }
        self.doc = candidate;
        self.status_message = None;
        self.persist_document();
        self.rerender();
        true
    }

    /// Start over: empty text, no session times, plugins rebuilt from the
    /// cleared document.
    pub fn clear(&mut self) {
        self.doc = Document::new();
        for key in [keys::TEXT, keys::START_TIME, keys::END_TIME] {
            if let Err(e) = self.storage.remove(key) {
                log::error!("failed to remove {}: {}", key, e);
            }
        }
        self.reinitialize_plugins();
        self.status_message = Some("Cleared".to_string());
    }

    pub fn copy_text(&mut self) {
        let payload = share_text(&self.doc, &self.clock.now());
        self.status_message = Some(match self.clipboard.set_text(&payload) {
            Ok(()) => "Copied to clipboard".to_string(),
            Err(e) => {
                log::warn!("copy failed: {}", e);
                format!("Copy failed: {}", e)
            }
        });
    }

    /// Write the share payload to `{zettel_id}.txt` in the export directory.
    pub fn export_to_file(&self) -> Result<PathBuf, ExportError> {
        let name = export_file_name(&self.doc).ok_or(ExportError::NotStarted)?;
        let dir = self.export_dir.as_ref().ok_or(ExportError::NoDirectory)?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(name);
        std::fs::write(&path, share_text(&self.doc, &self.clock.now()))?;
        log::info!("exported session to {}", path.display());
        Ok(path)
    }

    /// Merge `patch` into a plugin's config, persist, and rebuild the plugin set.
    pub fn update_plugin_config(&mut self, key: &str, patch: Map<String, Value>) {
        self.config.update(key, patch);
        if let Err(e) = self.config.persist(self.storage.as_mut()) {
            log::error!("failed to persist plugin config: {}", e);
        }
        self.apply_config();
    }

    pub fn set_plugin_enabled(&mut self, key: &str, enabled: bool) {
        let mut patch = Map::new();
        patch.insert("enabled".to_string(), Value::Bool(enabled));
        self.update_plugin_config(key, patch);
    }

    /// Store a settings choice. Picking a theme here also drops the
    /// `--theme` override for the rest of the run.
    pub fn choose_setting(&mut self, key: &str, field: &str, value: Value) {
        if key == theme_selector::KEY {
            self.theme_override = None;
        }
        let mut patch = Map::new();
        patch.insert(field.to_string(), value);
        self.update_plugin_config(key, patch);
    }

    /// Drive plugin schedules. Returns whether any plugin asked for a redraw.
    pub fn poll_ticks(&mut self) -> bool {
        self.registry.poll_ticks(self.clock.now());
        self.take_redraw_request()
    }

    pub fn take_redraw_request(&self) -> bool {
        self.redraw.replace(false)
    }

    pub fn slot_props(&self) -> SlotProps<'_> {
        SlotProps {
            doc: &self.doc,
            now: self.clock.now(),
            theme: self.theme,
        }
    }

    /// Toolbar or status contributions of the active plugins
    pub fn slot_views(&self, slot: Slot) -> Vec<(&'static str, SlotView)> {
        self.registry.slot_views(slot, &self.config, &self.slot_props())
    }

    pub fn settings_views(&self) -> Vec<(&'static str, SettingsView)> {
        self.slot_views(Slot::Settings)
            .into_iter()
            .filter_map(|(key, view)| match view {
                SlotView::Settings(settings) => Some((key, settings)),
                SlotView::Text { .. } => None,
            })
            .collect()
    }

    /// Settings panel rows in display order: each plugin's toggle, then its choice
    pub fn settings_rows(&self) -> Vec<SettingsRow> {
        let mut rows = Vec::new();
        for (plugin, view) in self.settings_views() {
            if let Some(enabled) = view.enabled {
                rows.push(SettingsRow::Toggle { plugin, enabled });
            }
            if let Some(choice) = view.choice {
                rows.push(SettingsRow::Choice { plugin, choice });
            }
        }
        rows
    }

    fn step_selected_setting(&mut self, forward: bool) {
        let Some(row) = self.settings_rows().into_iter().nth(self.settings_selected) else {
            return;
        };
        match row {
            SettingsRow::Toggle { plugin, enabled } => self.set_plugin_enabled(plugin, !enabled),
            SettingsRow::Choice { plugin, choice } => {
                let count = choice.options.len();
                if count == 0 {
                    return;
                }
                let next = match (choice.selected, forward) {
                    (None, _) => 0,
                    (Some(i), true) => (i + 1) % count,
                    (Some(i), false) => (i + count - 1) % count,
                };
                let value = choice.options[next].value.clone();
                self.choose_setting(plugin, choice.field, value);
            }
        }
    }

    /// Rebuild plugins and everything derived from the config.
    fn apply_config(&mut self) {
        self.reinitialize_plugins();
        self.theme = self.resolve_theme();
    }

    fn reinitialize_plugins(&mut self) {
        let redraw = Rc::clone(&self.redraw);
        let observer: TickObserver = Rc::new(move |_event: &TickEvent| redraw.set(true));
        let ctx = InitContext {
            doc: self.doc.clone(),
            clock: Rc::clone(&self.clock),
            observer: Some(observer),
        };
        let failures = self.registry.reinitialize(&mut self.bus, &self.config, &ctx);
        if let Some((key, e)) = failures.first() {
            self.status_message = Some(format!("Plugin {} failed: {}", key, e));
        }
        self.rerender();
    }

    fn resolve_theme(&self) -> ThemeName {
        let stored = self
            .config
            .get(theme_selector::KEY)
            .and_then(theme_selector::stored_theme);
        self.theme_override
            .or(stored)
            .unwrap_or(self.fallback_theme)
    }

    fn rerender(&mut self) {
        self.rendered = render_text(&self.bus, self.doc.text());
    }

    fn persist_document(&mut self) {
        let mut entries = vec![(keys::TEXT, Some(self.doc.text().to_string()))];
        entries.push((keys::START_TIME, self.doc.start_time().as_ref().map(format_timestamp)));
        entries.push((keys::END_TIME, self.doc.end_time().as_ref().map(format_timestamp)));
        for (key, value) in entries {
            let result = match value {
                Some(value) => self.storage.set(key, &value),
                None => self.storage.remove(key),
            };
            if let Err(e) = result {
                log::error!("failed to persist {}: {}", key, e);
            }
        }
    }
}

/// Rebuild the last session from storage. Unparseable timestamps count as absent.
fn load_document(storage: &dyn Storage) -> Document {
    let text = storage.get(keys::TEXT).unwrap_or_default();
    let timestamp = |key: &str| {
        let raw = storage.get(key)?;
        let parsed = parse_timestamp(&raw);
        if parsed.is_none() {
            log::warn!("ignoring unparseable {} '{}'", key, raw);
        }
        parsed
    };
    Document::restore(text, timestamp(keys::START_TIME), timestamp(keys::END_TIME))
}
