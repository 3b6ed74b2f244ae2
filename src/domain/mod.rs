//! Domain layer containing the button and session types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, state machines)
//! - `button` - Raw transitions, debounced events and the debouncer
//! - `session` - Viewer session lifecycle

pub mod button;
pub mod foundation;
pub mod session;
