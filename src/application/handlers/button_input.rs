//! ButtonInputHandler - Turns raw pin transitions into published events.
//!
//! This is the body of the event source callback. It runs on whatever
//! thread the source reports from, so it only debounces and hands the
//! accepted event to the publisher's non-blocking enqueue.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::button::{ButtonEvent, Debouncer, Level, RawTransition};
use crate::domain::foundation::ButtonId;
use crate::ports::{ButtonEventPublisher, TransitionSink};

/// Handler for raw transitions reported by an event source.
pub struct ButtonInputHandler {
    debouncer: Arc<Debouncer>,
    event_publisher: Arc<dyn ButtonEventPublisher>,
    /// Last level the source reported per button, bounces included.
    levels: RwLock<HashMap<ButtonId, Level>>,
}

impl ButtonInputHandler {
    pub fn new(debouncer: Arc<Debouncer>, event_publisher: Arc<dyn ButtonEventPublisher>) -> Self {
        Self {
            debouncer,
            event_publisher,
            levels: RwLock::new(HashMap::new()),
        }
    }

    /// Debounce one transition and publish it if accepted.
    ///
    /// Publishing happens while the button's debounce state is held, so
    /// events of one button reach the publisher in acceptance order.
    pub fn handle(&self, transition: RawTransition) -> Option<ButtonEvent> {
        let event = self.debouncer.accept_then(transition, |event| {
            self.event_publisher.publish(event);
        })?;

        tracing::info!(
            button = %event.button,
            kind = %event.kind,
            "Button event accepted"
        );
        Some(event)
    }

    pub fn debouncer(&self) -> &Arc<Debouncer> {
        &self.debouncer
    }

    /// Last level sampled from the button's pin, if the source reported one.
    pub fn level(&self, button: ButtonId) -> Option<Level> {
        self.levels.read().get(&button).copied()
    }
}

impl TransitionSink for ButtonInputHandler {
    fn on_transition(&self, button: ButtonId, level: Level) {
        let transition = RawTransition::now(button, level);
        self.levels.write().insert(button, level);
        self.handle(transition);
    }

    fn on_level(&self, button: ButtonId, level: Level) {
        self.levels.write().insert(button, level);
    }
}
