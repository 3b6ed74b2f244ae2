//! HTTP adapter for relay status and manual triggering.

mod dto;
mod handlers;
mod routes;

pub use dto::{ButtonStatusResponse, ErrorResponse, PressResponse, StatusResponse};
pub use handlers::StatusHandlers;
pub use routes::status_routes;
