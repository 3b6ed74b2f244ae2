//! HTTP adapters - REST API implementations.

pub mod status;

pub use status::{status_routes, StatusHandlers};
