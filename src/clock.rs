// clock.rs - Time source for session timestamps and timers

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, SubsecRound, TimeDelta};
use std::cell::Cell;
use std::rc::Rc;

/// A point in time with the writer's UTC offset attached.
pub type Timestamp = DateTime<FixedOffset>;

/// Source of "now" for the document model and timer plugins.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock in the local timezone
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Local::now().fixed_offset()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Timestamp>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Create a clock from an RFC 3339 string, falling back to the Unix epoch
    pub fn starting_at(rfc3339: &str) -> Self {
        let start = parse_timestamp(rfc3339).unwrap_or_else(|| DateTime::UNIX_EPOCH.fixed_offset());
        Self::new(start)
    }

    pub fn advance(&self, delta: TimeDelta) {
        self.now.set(self.now.get() + delta);
    }

    pub fn set(&self, at: Timestamp) {
        self.now.set(at);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

/// Drop sub-second precision; session timestamps are stored in whole seconds.
pub fn truncate_to_seconds(at: Timestamp) -> Timestamp {
    at.trunc_subsecs(0)
}

/// RFC 3339 with seconds precision and an explicit offset, e.g. `2024-03-01T09:30:00+01:00`
pub fn format_timestamp(at: &Timestamp) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, false)
}

pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(value.trim()).ok()
}
