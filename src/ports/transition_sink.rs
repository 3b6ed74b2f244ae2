//! TransitionSink port - The callback an event source reports edges to.

use crate::domain::button::Level;
use crate::domain::foundation::ButtonId;

/// Receiver of raw pin transitions.
///
/// Event sources call `on_transition` once per edge, from any thread,
/// possibly concurrently. Implementations only do bookkeeping and a
/// non-blocking handoff.
pub trait TransitionSink: Send + Sync {
    fn on_transition(&self, button: ButtonId, level: Level);

    /// A sampled level that is not an edge, such as the first read after
    /// the pin is configured. Never debounced or published.
    fn on_level(&self, _button: ButtonId, _level: Level) {}
}
