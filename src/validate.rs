// validate.rs - Lets plugins veto a candidate document before it is committed

use crate::document::Document;
use crate::event_bus::{EventBus, ValidateInput};

/// Payload of the `validate:input` channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPayload {
    pub allowed: bool,
    pub reason: Option<String>,
    pub doc: Document,
}

impl ValidationPayload {
    pub fn new(doc: Document) -> Self {
        Self {
            allowed: true,
            reason: None,
            doc,
        }
    }

    pub fn veto(self, reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl ValidationOutcome {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }
}

/// Ask every validation subscriber whether `candidate` may be committed.
///
/// A veto is final: once a handler returns `allowed: false` the remaining
/// handlers are skipped, so a later plugin cannot silently re-allow input.
pub fn validate_input(bus: &EventBus, candidate: &Document) -> ValidationOutcome {
    let result = bus.publish_until::<ValidateInput>(
        ValidationPayload::new(candidate.clone()),
        |payload| !payload.allowed,
    );
    if !result.allowed {
        log::debug!(
            "input vetoed: {}",
            result.reason.as_deref().unwrap_or("no reason given")
        );
    }
    ValidationOutcome {
        allowed: result.allowed,
        reason: result.reason,
    }
}
