//! HTTP routes for status endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_status, health, press_button, StatusHandlers};

/// Creates the status router with all endpoints.
pub fn status_routes(handlers: StatusHandlers) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(get_status))
        .route("/api/buttons/:button/press", post(press_button))
        .with_state(handlers)
}
