//! Application layer - Input handling and the composition root.
//!
//! Handlers orchestrate domain operations through ports; [`Relay`] wires
//! the concrete adapters together and owns the shared state.

mod error;
pub mod handlers;
mod relay;

pub use error::StartupError;
pub use handlers::ButtonInputHandler;
pub use relay::{run, Relay};
