//! Session module - lifecycle of a connected viewer.

mod status;

pub use status::SessionStatus;
