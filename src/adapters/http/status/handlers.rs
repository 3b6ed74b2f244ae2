//! HTTP handlers for status endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::RwLock;

use crate::adapters::websocket::ClientRegistry;
use crate::application::handlers::ButtonInputHandler;
use crate::config::PinMapping;
use crate::domain::button::RawTransition;
use crate::domain::foundation::ButtonId;

use super::dto::{ButtonStatusResponse, ErrorResponse, PressResponse, StatusResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct StatusHandlers {
    registry: Arc<ClientRegistry>,
    input_handler: Arc<ButtonInputHandler>,
    pins: Arc<[PinMapping]>,
    source: Arc<RwLock<Option<&'static str>>>,
}

impl StatusHandlers {
    pub fn new(
        registry: Arc<ClientRegistry>,
        input_handler: Arc<ButtonInputHandler>,
        pins: impl Into<Arc<[PinMapping]>>,
        source: Arc<RwLock<Option<&'static str>>>,
    ) -> Self {
        Self {
            registry,
            input_handler,
            pins: pins.into(),
            source,
        }
    }

    fn pin_for(&self, button: ButtonId) -> Option<u32> {
        self.pins.iter().find(|m| m.button == button).map(|m| m.pin)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/status - Connected viewers and per-button state
pub async fn get_status(State(handlers): State<StatusHandlers>) -> Response {
    let debouncer = handlers.input_handler.debouncer();
    let config = debouncer.config();

    let buttons = handlers
        .pins
        .iter()
        .map(|m| {
            ButtonStatusResponse::new(
                m.button,
                m.pin,
                handlers.input_handler.level(m.button),
                debouncer.last_accepted(m.button),
            )
        })
        .collect();
    let source = *handlers.source.read();

    let response = StatusResponse {
        connected_clients: handlers.registry.len(),
        debounce_window_ms: config.window.as_millis() as u64,
        emit_released: config.emit_released,
        source,
        gpio_ready: source.is_some(),
        buttons,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// POST /api/buttons/:button/press - Inject a press through the input path
pub async fn press_button(
    State(handlers): State<StatusHandlers>,
    Path(button): Path<String>,
) -> Response {
    let button = match button.parse::<ButtonId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid button ID")),
            )
                .into_response()
        }
    };

    if handlers.pin_for(button).is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Button", &button.to_string())),
        )
            .into_response();
    }

    let level = handlers.input_handler.debouncer().config().polarity.pressed_level();
    let accepted = handlers
        .input_handler
        .handle(RawTransition::now(button, level))
        .is_some();

    tracing::debug!(%button, accepted, "Manual press");

    let response = PressResponse {
        button,
        accepted,
        clients: handlers.registry.len(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /health - Liveness check
pub async fn health() -> &'static str {
    "ok"
}
