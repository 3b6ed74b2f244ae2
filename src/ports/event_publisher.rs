//! ButtonEventPublisher port - Interface for fanning out debounced events.
//!
//! The input path calls `publish` from whatever thread the event source
//! runs on, so implementations must not block or perform network I/O
//! inline.

use crate::domain::button::ButtonEvent;

/// Port for publishing debounced button events to viewers.
///
/// Implementations must ensure:
/// - `publish` returns promptly and never fails from the caller's view
/// - Successive calls reach each viewer in call order
/// - A failing viewer does not affect delivery to the others
pub trait ButtonEventPublisher: Send + Sync {
    /// Hand one event off for delivery.
    ///
    /// Returns the number of viewers the event was queued for.
    fn publish(&self, event: &ButtonEvent) -> usize;
}
