//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the core and the outside world. Adapters implement these ports.
//!
//! - `TransitionSink` - Callback an event source reports raw edges to
//! - `EventSource` - Starts edge detection on the configured pins
//! - `ButtonEventPublisher` - Fans debounced events out to viewers

mod event_publisher;
mod event_source;
mod transition_sink;

pub use event_publisher::ButtonEventPublisher;
pub use event_source::{EventSource, SourceError};
pub use transition_sink::TransitionSink;
