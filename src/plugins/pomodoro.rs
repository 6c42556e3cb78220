// plugins/pomodoro.rs - Time-boxed writing sessions
//
// Input is vetoed once the configured duration has elapsed since the
// document's start time. The countdown display refreshes once per second
// through the instance's own schedule; only the validation handler gates input.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::TimeDelta;
use serde_json::{Map, Value, json};

use crate::clock::{Clock, Timestamp};
use crate::document::Document;
use crate::event_bus::{EventBus, Handler, ValidateInput};
use crate::plugin::{
    Capability, ChoiceOption, InitContext, Plugin, PluginConfig, PluginDescriptor, PluginError,
    PluginInstance, SettingChoice, SettingsView, Slot, SlotProps, SlotView, TickEvent,
    TickObserver, Tone,
};
use crate::validate::ValidationPayload;

pub const KEY: &str = "pomodoroTimer";
pub const DURATION_OPTION: &str = "duration";
pub const DEFAULT_DURATION_MS: u64 = 25 * 60 * 1000;
pub const DURATION_CHOICES_MINUTES: [u64; 6] = [5, 10, 15, 25, 45, 60];
pub const COMPLETE_REASON: &str = "Pomodoro session complete";
pub const COMPLETE_STATUS: &str = "Time is up, clear (^X) to start a new session";

fn tick_period() -> TimeDelta {
    TimeDelta::seconds(1)
}

/// `m:ss`, rounded down to whole seconds
pub fn format_remaining(remaining: TimeDelta) -> String {
    let ms = remaining.num_milliseconds().max(0);
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    format!("{minutes}:{seconds:02}")
}

pub struct PomodoroTimer {
    descriptor: PluginDescriptor,
}

impl PomodoroTimer {
    pub fn new() -> Self {
        let mut defaults = Map::new();
        defaults.insert(DURATION_OPTION.to_string(), json!(DEFAULT_DURATION_MS));
        Self {
            descriptor: PluginDescriptor {
                key: KEY,
                name: "Pomodoro Timer",
                description: "Time-limited writing sessions with focus periods",
                default_config: defaults,
                capabilities: vec![
                    Capability::ValidationSubscriber,
                    Capability::PeriodicTicker,
                    Capability::ToolbarUi,
                    Capability::StatusUi,
                    Capability::SettingsUi,
                ],
            },
        }
    }
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for PomodoroTimer {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn instantiate(&self) -> Box<dyn PluginInstance> {
        Box::new(PomodoroInstance::default())
    }

    fn settings_view(&self, config: &PluginConfig, _props: &SlotProps<'_>) -> Option<SettingsView> {
        // Duration picker only shows once the timer is on.
        let choice = config.enabled.then(|| {
            let current = config.option_u64(DURATION_OPTION);
            let options: Vec<ChoiceOption> = DURATION_CHOICES_MINUTES
                .iter()
                .map(|minutes| ChoiceOption {
                    label: format!("{minutes:>2} minutes"),
                    value: json!(minutes * 60 * 1000),
                })
                .collect();
            let selected = options
                .iter()
                .position(|option| option.value.as_u64() == current);
            SettingChoice {
                label: "Duration",
                field: DURATION_OPTION,
                options,
                selected,
            }
        });
        Some(SettingsView {
            title: self.descriptor.name,
            description: "Limits writing sessions to focused time periods",
            enabled: Some(config.enabled),
            choice,
        })
    }
}

/// Per-instance session state shared with the validation handler
struct Session {
    start: Option<Timestamp>,
    duration: TimeDelta,
}

impl Session {
    /// Follow the document: adopt its start time the first time one appears,
    /// forget it when the document is cleared.
    fn observe(&mut self, doc: &Document) {
        match doc.start_time() {
            Some(start) if self.start.is_none() => self.start = Some(start),
            None => self.start = None,
            Some(_) => {}
        }
    }

    /// Time left, between zero and the full duration. A start time in the
    /// future counts as no time elapsed.
    fn remaining_at(&self, now: Timestamp) -> TimeDelta {
        let Some(start) = self.start else {
            return self.duration;
        };
        let elapsed = now.signed_duration_since(start).max(TimeDelta::zero());
        self.duration
            .checked_sub(&elapsed)
            .unwrap_or(TimeDelta::zero())
            .max(TimeDelta::zero())
    }
}

/// Cancellable once-per-period schedule
struct Interval {
    next_due: Timestamp,
}

#[derive(Default)]
struct PomodoroInstance {
    session: Option<Rc<RefCell<Session>>>,
    handler: Option<Handler<ValidationPayload>>,
    interval: Option<Interval>,
    observer: Option<TickObserver>,
}

fn duration_from(config: &PluginConfig) -> Result<TimeDelta, PluginError> {
    let ms = match config.option(DURATION_OPTION) {
        None => DEFAULT_DURATION_MS,
        Some(value) => value.as_u64().ok_or_else(|| PluginError::InvalidOption {
            key: KEY,
            option: DURATION_OPTION,
            message: format!("expected milliseconds, got {value}"),
        })?,
    };
    i64::try_from(ms)
        .ok()
        .and_then(TimeDelta::try_milliseconds)
        .ok_or_else(|| PluginError::InvalidOption {
            key: KEY,
            option: DURATION_OPTION,
            message: format!("{ms} ms is out of range"),
        })
}

impl PluginInstance for PomodoroInstance {
    fn initialize(
        &mut self,
        bus: &mut EventBus,
        config: &PluginConfig,
        ctx: &InitContext,
    ) -> Result<(), PluginError> {
        let duration = duration_from(config)?;
        // Resume from the persisted session, never from "now".
        let session = Rc::new(RefCell::new(Session {
            start: ctx.doc.start_time(),
            duration,
        }));

        let handler: Handler<ValidationPayload> = {
            let session = Rc::clone(&session);
            let clock = Rc::clone(&ctx.clock);
            Rc::new(move |payload: ValidationPayload| {
                let mut session = session.borrow_mut();
                session.observe(&payload.doc);
                if session.remaining_at(clock.now()) == TimeDelta::zero() {
                    payload.veto(COMPLETE_REASON)
                } else {
                    payload
                }
            })
        };
        bus.subscribe::<ValidateInput>(&handler);

        self.session = Some(session);
        self.handler = Some(handler);
        self.interval = Some(Interval {
            next_due: ctx.clock.now() + tick_period(),
        });
        self.observer = ctx.observer.clone();
        log::debug!("pomodoro started with {}", format_remaining(duration));
        Ok(())
    }

    fn cleanup(&mut self, bus: &mut EventBus) {
        if let Some(handler) = self.handler.take() {
            bus.unsubscribe::<ValidateInput>(&handler);
        }
        self.interval = None;
        self.observer = None;
        self.session = None;
    }

    fn poll_tick(&mut self, now: Timestamp) -> bool {
        let Some(interval) = self.interval.as_mut() else {
            return false;
        };
        if now < interval.next_due {
            return false;
        }
        interval.next_due = now + tick_period();
        if let Some(observer) = &self.observer {
            observer(&TickEvent { plugin: KEY, at: now });
        }
        true
    }

    fn slot_view(&self, slot: Slot, props: &SlotProps<'_>) -> Option<SlotView> {
        let remaining = self.session.as_ref()?.borrow().remaining_at(props.now);
        let expired = remaining == TimeDelta::zero();
        match slot {
            Slot::Toolbar if expired => Some(SlotView::Text {
                text: "⏰ Session Complete".to_string(),
                tone: Tone::Expired,
            }),
            Slot::Toolbar => Some(SlotView::Text {
                text: format!("⏱️ {}", format_remaining(remaining)),
                tone: Tone::Active,
            }),
            Slot::Status if expired => Some(SlotView::Text {
                text: COMPLETE_STATUS.to_string(),
                tone: Tone::Expired,
            }),
            _ => None,
        }
    }
}

/// Config patch selecting a duration in minutes
pub fn duration_patch(minutes: u64) -> Map<String, Value> {
    let mut patch = Map::new();
    patch.insert(DURATION_OPTION.to_string(), json!(minutes * 60 * 1000));
    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::ui::theme::ThemeName;
    use crate::validate::validate_input;
    use std::cell::Cell;

    fn setup(clock: &ManualClock, doc: Document) -> (EventBus, Box<dyn PluginInstance>, Rc<Cell<usize>>) {
        let ticks = Rc::new(Cell::new(0));
        let observer: TickObserver = {
            let ticks = Rc::clone(&ticks);
            Rc::new(move |_event: &TickEvent| ticks.set(ticks.get() + 1))
        };
        let ctx = InitContext {
            doc,
            clock: Rc::new(clock.clone()),
            observer: Some(observer),
        };
        let mut bus = EventBus::new();
        let plugin = PomodoroTimer::new();
        let mut instance = plugin.instantiate();
        let mut config = PluginConfig {
            enabled: true,
            options: plugin.descriptor().default_config.clone(),
        };
        config.options.extend(duration_patch(25));
        instance.initialize(&mut bus, &config, &ctx).unwrap();
        (bus, instance, ticks)
    }

    fn toolbar(instance: &dyn PluginInstance, doc: &Document, now: Timestamp) -> String {
        let props = SlotProps {
            doc,
            now,
            theme: ThemeName::Default,
        };
        match instance.slot_view(Slot::Toolbar, &props) {
            Some(SlotView::Text { text, .. }) => text,
            other => panic!("unexpected slot view {other:?}"),
        }
    }

    #[test]
    fn test_format_remaining_rounds_down() {
        assert_eq!(format_remaining(TimeDelta::milliseconds(5_999)), "0:05");
        assert_eq!(format_remaining(TimeDelta::minutes(25)), "25:00");
        assert_eq!(format_remaining(TimeDelta::milliseconds(-10)), "0:00");
    }

    #[test]
    fn test_full_duration_before_session_starts() {
        let clock = ManualClock::starting_at("2024-03-01T09:30:00+00:00");
        let doc = Document::new();
        let (_bus, instance, _) = setup(&clock, doc.clone());
        clock.advance(TimeDelta::hours(3));
        assert_eq!(toolbar(instance.as_ref(), &doc, clock.now()), "⏱️ 25:00");
        let props = SlotProps {
            doc: &doc,
            now: clock.now(),
            theme: ThemeName::Default,
        };
        assert_eq!(instance.slot_view(Slot::Status, &props), None);
    }

    #[test]
    fn test_expired_session_vetoes_until_cleared() {
        let clock = ManualClock::starting_at("2024-03-01T09:30:00+00:00");
        let (bus, instance, _) = setup(&clock, Document::new());

        let doc = Document::new().appended("H", clock.now());
        assert!(validate_input(&bus, &doc).allowed);

        clock.advance(TimeDelta::minutes(25));
        let outcome = validate_input(&bus, &doc.appended("i", clock.now()));
        assert!(!outcome.allowed);
        assert_eq!(outcome.reason.as_deref(), Some(COMPLETE_REASON));
        assert_eq!(toolbar(instance.as_ref(), &doc, clock.now()), "⏰ Session Complete");
        let props = SlotProps {
            doc: &doc,
            now: clock.now(),
            theme: ThemeName::Default,
        };
        assert_eq!(
            instance.slot_view(Slot::Status, &props),
            Some(SlotView::Text {
                text: COMPLETE_STATUS.to_string(),
                tone: Tone::Expired,
            })
        );

        // Clearing resets the session; the next keystroke starts a new one.
        assert!(validate_input(&bus, &Document::new()).allowed);
        let fresh = Document::new().appended("N", clock.now());
        assert!(validate_input(&bus, &fresh).allowed);
    }

    #[test]
    fn test_resumes_from_persisted_start() {
        let clock = ManualClock::starting_at("2024-03-01T09:30:00+00:00");
        let doc = Document::new().appended("old", clock.now());
        clock.advance(TimeDelta::minutes(20));
        let (_bus, instance, _) = setup(&clock, doc.clone());
        assert_eq!(toolbar(instance.as_ref(), &doc, clock.now()), "⏱️ 5:00");
    }

    #[test]
    fn test_future_start_with_longest_duration_shows_full_time() {
        let clock = ManualClock::starting_at("2024-03-01T09:30:00+00:00");
        let later = ManualClock::starting_at("2024-03-01T10:00:00+00:00");
        let doc = Document::new().appended("skewed", later.now());
        let config = PluginConfig {
            enabled: true,
            options: Map::from_iter([(DURATION_OPTION.to_string(), json!(i64::MAX))]),
        };
        let duration = duration_from(&config).unwrap();
        let session = Session {
            start: doc.start_time(),
            duration,
        };
        assert_eq!(session.remaining_at(clock.now()), duration);
        clock.advance(TimeDelta::hours(2));
        assert!(session.remaining_at(clock.now()) < duration);
    }

    #[test]
    fn test_ticks_once_per_second_until_cleanup() {
        let clock = ManualClock::starting_at("2024-03-01T09:30:00+00:00");
        let (mut bus, mut instance, ticks) = setup(&clock, Document::new());

        assert!(!instance.poll_tick(clock.now()));
        clock.advance(TimeDelta::milliseconds(1000));
        assert!(instance.poll_tick(clock.now()));
        assert!(!instance.poll_tick(clock.now()));
        assert_eq!(ticks.get(), 1);

        instance.cleanup(&mut bus);
        clock.advance(TimeDelta::seconds(5));
        assert!(!instance.poll_tick(clock.now()));
        assert_eq!(ticks.get(), 1);
        assert_eq!(bus.subscription_count(), 0);
    }

    #[test]
    fn test_invalid_duration_is_rejected() {
        let mut config = PluginConfig {
            enabled: true,
            options: Map::new(),
        };
        config
            .options
            .insert(DURATION_OPTION.to_string(), json!("soon"));
        assert!(matches!(
            duration_from(&config),
            Err(PluginError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_settings_show_duration_only_when_enabled() {
        let plugin = PomodoroTimer::new();
        let doc = Document::new();
        let props = SlotProps {
            doc: &doc,
            now: ManualClock::starting_at("2024-03-01T09:30:00+00:00").now(),
            theme: ThemeName::Default,
        };
        let disabled = plugin
            .settings_view(&PluginConfig::default(), &props)
            .unwrap();
        assert!(disabled.choice.is_none());

        let mut config = PluginConfig {
            enabled: true,
            options: Map::new(),
        };
        config.options.extend(duration_patch(15));
        let enabled = plugin.settings_view(&config, &props).unwrap();
        assert_eq!(enabled.choice.unwrap().selected, Some(2));
    }
}
