//! Per-button debouncing of raw transitions.
//!
//! Every button owns its own `DebounceState` behind its own lock, so a
//! burst on one button never delays another. Buttons that were not
//! configured up front get a state slot on first use.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};

use crate::domain::foundation::{ButtonId, Timestamp};

use super::events::{ButtonEvent, RawTransition};
use super::level::{ButtonEventKind, Polarity};

/// Default debounce window.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(50);

/// Debounce policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    /// Minimum spacing between two accepted transitions of one button.
    pub window: Duration,

    /// How levels map to press/release.
    pub polarity: Polarity,

    /// When false, release-level transitions are dropped before debouncing
    /// and never consume the window (single-shot press detection).
    pub emit_released: bool,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_DEBOUNCE_WINDOW,
            polarity: Polarity::default(),
            emit_released: true,
        }
    }
}

impl DebounceConfig {
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn with_emit_released(mut self, emit_released: bool) -> Self {
        self.emit_released = emit_released;
        self
    }
}

#[derive(Debug, Default)]
struct DebounceState {
    /// Monotonic time of the last accepted transition.
    last_observed: Option<Instant>,
    /// Wall-clock time of the same transition, for reporting.
    last_timestamp: Option<Timestamp>,
}

/// Edge-triggered debouncer with one lock per button.
///
/// Spacing is measured on the monotonic clock carried by each
/// [`RawTransition`], never on wall-clock time.
pub struct Debouncer {
    config: DebounceConfig,
    states: RwLock<HashMap<ButtonId, Arc<Mutex<DebounceState>>>>,
}

impl Debouncer {
    /// Creates a debouncer with state slots for the given buttons.
    pub fn new(config: DebounceConfig, buttons: impl IntoIterator<Item = ButtonId>) -> Self {
        let states = buttons
            .into_iter()
            .map(|button| (button, Arc::new(Mutex::new(DebounceState::default()))))
            .collect();

        Self {
            config,
            states: RwLock::new(states),
        }
    }

    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    /// Debounces one transition.
    ///
    /// Returns the resulting event when the transition is accepted.
    pub fn accept(&self, transition: RawTransition) -> Option<ButtonEvent> {
        self.accept_then(transition, |_| {})
    }

    /// Debounces one transition and runs `deliver` on the accepted event
    /// while the button's state is still locked.
    ///
    /// Handing events off inside the lock keeps them in acceptance order
    /// even when the source calls in from several threads.
    pub fn accept_then<F>(&self, transition: RawTransition, deliver: F) -> Option<ButtonEvent>
    where
        F: FnOnce(&ButtonEvent),
    {
        let kind = self.config.polarity.kind_for(transition.level);
        if kind == ButtonEventKind::Released && !self.config.emit_released {
            return None;
        }

        let slot = self.slot(transition.button);
        let mut state = slot.lock();

        if let Some(last) = state.last_observed {
            // A same-instant repeat is always a bounce, even with a zero window.
            if transition.observed_at <= last
                || transition.observed_at.duration_since(last) < self.config.window
            {
                tracing::trace!(
                    button = %transition.button,
                    elapsed_ms = transition.observed_at.saturating_duration_since(last).as_millis() as u64,
                    "Transition suppressed"
                );
                return None;
            }
        }

        state.last_observed = Some(transition.observed_at);
        state.last_timestamp = Some(transition.timestamp);
        let event = ButtonEvent {
            button: transition.button,
            kind,
            timestamp: transition.timestamp,
            observed_at: transition.observed_at,
        };
        deliver(&event);
        Some(event)
    }

    /// Wall-clock time of a button's last accepted transition, if any.
    pub fn last_accepted(&self, button: ButtonId) -> Option<Timestamp> {
        self.states
            .read()
            .get(&button)
            .and_then(|slot| slot.lock().last_timestamp)
    }

    /// Buttons with a state slot, in ascending order.
    pub fn buttons(&self) -> Vec<ButtonId> {
        let mut buttons: Vec<ButtonId> = self.states.read().keys().copied().collect();
        buttons.sort();
        buttons
    }

    fn slot(&self, button: ButtonId) -> Arc<Mutex<DebounceState>> {
        if let Some(slot) = self.states.read().get(&button) {
            return Arc::clone(slot);
        }
        let mut states = self.states.write();
        Arc::clone(states.entry(button).or_default())
    }
}
