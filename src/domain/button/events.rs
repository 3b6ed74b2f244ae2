//! Raw and debounced button events.
//!
//! Two clocks travel with every transition. `observed_at` is monotonic and
//! is the only thing the debouncer compares; `timestamp` is wall-clock time
//! and is only reported to viewers, so NTP steps never stall the buttons.

use std::time::Instant;

use crate::domain::foundation::{ButtonId, Timestamp};

use super::level::{ButtonEventKind, Level};

/// One edge reported by the event source, before debouncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTransition {
    pub button: ButtonId,
    pub level: Level,
    /// Monotonic time of the edge.
    pub observed_at: Instant,
    /// Wall-clock time of the edge.
    pub timestamp: Timestamp,
}

impl RawTransition {
    pub fn new(button: ButtonId, level: Level, observed_at: Instant, timestamp: Timestamp) -> Self {
        Self {
            button,
            level,
            observed_at,
            timestamp,
        }
    }

    /// A transition observed right now.
    pub fn now(button: ButtonId, level: Level) -> Self {
        Self::new(button, level, Instant::now(), Timestamp::now())
    }
}

/// A debounced press or release, the unit fanned out to viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub button: ButtonId,
    pub kind: ButtonEventKind,
    /// Wall-clock time sent on the wire.
    pub timestamp: Timestamp,
    /// Monotonic acceptance time; orders events of one button.
    pub observed_at: Instant,
}
