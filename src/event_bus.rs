// event_bus.rs - Synchronous fold-style publish/subscribe
//
// Publishing threads a payload through every subscriber of a channel in
// registration order; each handler receives the previous handler's output.
// Handlers are not isolated: a panicking handler unwinds through `publish`.

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::render::RenderPayload;
use crate::validate::ValidationPayload;

/// A subscriber. Identity is the `Rc` allocation, so keep a clone of the
/// handler around to unsubscribe it later.
pub type Handler<P> = Rc<dyn Fn(P) -> P>;

/// Ordered list of handlers for one payload type
pub struct Channel<P> {
    handlers: Vec<Handler<P>>,
}

impl<P> Default for Channel<P> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<P> Channel<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when `handler` was already subscribed.
    pub fn subscribe(&mut self, handler: &Handler<P>) -> bool {
        if self.contains(handler) {
            return false;
        }
        self.handlers.push(Rc::clone(handler));
        true
    }

    pub fn unsubscribe(&mut self, handler: &Handler<P>) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|h| !Rc::ptr_eq(h, handler));
        self.handlers.len() != before
    }

    pub fn contains(&self, handler: &Handler<P>) -> bool {
        self.handlers.iter().any(|h| Rc::ptr_eq(h, handler))
    }

    pub fn publish(&self, payload: P) -> P {
        self.handlers.iter().fold(payload, |acc, handler| handler(acc))
    }

    /// Like [`Channel::publish`], but stops before the next handler once
    /// `done` holds for the accumulated payload.
    pub fn publish_until(&self, payload: P, done: impl Fn(&P) -> bool) -> P {
        let mut acc = payload;
        for handler in &self.handlers {
            if done(&acc) {
                break;
            }
            acc = handler(acc);
        }
        acc
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

/// A well-known channel with a fixed payload type.
pub trait Event {
    type Payload;
    const NAME: &'static str;

    fn channel(bus: &EventBus) -> &Channel<Self::Payload>;
    fn channel_mut(bus: &mut EventBus) -> &mut Channel<Self::Payload>;
}

/// Rendering transform channel (`render:text`)
pub struct RenderText;

impl Event for RenderText {
    type Payload = RenderPayload;
    const NAME: &'static str = "render:text";

    fn channel(bus: &EventBus) -> &Channel<RenderPayload> {
        &bus.render
    }

    fn channel_mut(bus: &mut EventBus) -> &mut Channel<RenderPayload> {
        &mut bus.render
    }
}

/// Input veto channel (`validate:input`)
pub struct ValidateInput;

impl Event for ValidateInput {
    type Payload = ValidationPayload;
    const NAME: &'static str = "validate:input";

    fn channel(bus: &EventBus) -> &Channel<ValidationPayload> {
        &bus.validate
    }

    fn channel_mut(bus: &mut EventBus) -> &mut Channel<ValidationPayload> {
        &mut bus.validate
    }
}

#[derive(Default)]
pub struct EventBus {
    render: Channel<RenderPayload>,
    validate: Channel<ValidationPayload>,
    named: HashMap<String, Channel<Value>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<E: Event>(&mut self, handler: &Handler<E::Payload>) -> bool {
        let added = E::channel_mut(self).subscribe(handler);
        if !added {
            log::debug!("handler already subscribed to {}", E::NAME);
        }
        added
    }

    pub fn unsubscribe<E: Event>(&mut self, handler: &Handler<E::Payload>) -> bool {
        E::channel_mut(self).unsubscribe(handler)
    }

    pub fn publish<E: Event>(&self, payload: E::Payload) -> E::Payload {
        E::channel(self).publish(payload)
    }

    pub fn publish_until<E: Event>(
        &self,
        payload: E::Payload,
        done: impl Fn(&E::Payload) -> bool,
    ) -> E::Payload {
        E::channel(self).publish_until(payload, done)
    }

    pub fn subscribers<E: Event>(&self) -> usize {
        E::channel(self).len()
    }

    pub fn is_subscribed<E: Event>(&self, handler: &Handler<E::Payload>) -> bool {
        E::channel(self).contains(handler)
    }

    // Ad-hoc channels carry JSON payloads and are created on first subscribe.

    pub fn subscribe_named(&mut self, name: &str, handler: &Handler<Value>) -> bool {
        self.named.entry(name.to_string()).or_default().subscribe(handler)
    }

    pub fn unsubscribe_named(&mut self, name: &str, handler: &Handler<Value>) -> bool {
        let removed = match self.named.get_mut(name) {
            Some(channel) => channel.unsubscribe(handler),
            None => return false,
        };
        if self.named.get(name).is_some_and(Channel::is_empty) {
            self.named.remove(name);
        }
        removed
    }

    pub fn publish_named(&self, name: &str, payload: Value) -> Value {
        match self.named.get(name) {
            Some(channel) => channel.publish(payload),
            None => payload,
        }
    }

    /// Total live subscriptions across every channel.
    pub fn subscription_count(&self) -> usize {
        let named: usize = self.named.values().map(Channel::len).sum();
        self.render.len() + self.validate.len() + named
    }

    /// Drop every subscription on every channel.
    pub fn clear(&mut self) {
        self.render.clear();
        self.validate.clear();
        self.named.clear();
    }
}
