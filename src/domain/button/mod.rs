//! Button module - turning raw pin edges into debounced events.

mod debouncer;
mod events;
mod level;

pub use debouncer::{DebounceConfig, Debouncer, DEFAULT_DEBOUNCE_WINDOW};
pub use events::{ButtonEvent, RawTransition};
pub use level::{ButtonEventKind, Level, Polarity};
