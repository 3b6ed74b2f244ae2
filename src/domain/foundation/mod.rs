//! Foundation module - Shared domain primitives.
//!
//! Contains the identifiers, timestamps and state machine support
//! that the button and session modules build on.

mod ids;
mod state_machine;
mod timestamp;

pub use ids::{ButtonId, ClientId};
pub use state_machine::{StateMachine, TransitionError};
pub use timestamp::Timestamp;
