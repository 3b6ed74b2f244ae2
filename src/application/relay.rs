//! Relay - Composition root wiring input, fan-out and the network surface.
//!
//! Owns the client registry and the shutdown channel, so nothing in the
//! crate depends on globals. Tests build a `Relay` directly and drive it
//! through a `SimulatedSource` or the HTTP surface.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use parking_lot::RwLock;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::gpio::{SimulatedSource, SysfsGpioSource};
use crate::adapters::http::{status_routes, StatusHandlers};
use crate::adapters::websocket::{
    websocket_router, Broadcaster, ClientRegistry, SessionSettings, WebSocketState,
};
use crate::config::{AppConfig, PinMapping, SourceKind};
use crate::domain::button::{DebounceConfig, Debouncer};
use crate::ports::{EventSource, TransitionSink};

use super::error::StartupError;
use super::handlers::ButtonInputHandler;

/// The running relay: one debouncer, one registry, one broadcaster.
pub struct Relay {
    registry: Arc<ClientRegistry>,
    broadcaster: Arc<Broadcaster>,
    input_handler: Arc<ButtonInputHandler>,
    pins: Arc<[PinMapping]>,
    settings: SessionSettings,
    /// Name of the event source once it has configured its pins.
    source: Arc<RwLock<Option<&'static str>>>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl Relay {
    pub fn new(debounce: DebounceConfig, pins: Vec<PinMapping>, settings: SessionSettings) -> Self {
        let registry = Arc::new(ClientRegistry::new());
        let broadcaster = Arc::new(Broadcaster::new(Arc::clone(&registry)));
        let debouncer = Arc::new(Debouncer::new(debounce, pins.iter().map(|m| m.button)));
        let input_handler = Arc::new(ButtonInputHandler::new(
            debouncer,
            Arc::clone(&broadcaster) as _,
        ));
        let (shutdown, _) = watch::channel(false);

        Self {
            registry,
            broadcaster,
            input_handler,
            pins: pins.into(),
            settings,
            source: Arc::new(RwLock::new(None)),
            shutdown: Arc::new(shutdown),
        }
    }

    /// Build a relay from validated configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let debounce = DebounceConfig::default()
            .with_window(config.debounce.window())
            .with_polarity(config.buttons.polarity)
            .with_emit_released(config.debounce.emit_released);
        let settings = SessionSettings {
            send_timeout: config.broadcast.send_timeout(),
            queue_capacity: config.broadcast.client_queue_capacity,
        };

        Ok(Self::new(debounce, config.buttons.pin_map()?, settings))
    }

    pub fn registry(&self) -> &Arc<ClientRegistry> {
        &self.registry
    }

    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        &self.broadcaster
    }

    pub fn input_handler(&self) -> &Arc<ButtonInputHandler> {
        &self.input_handler
    }

    pub fn pins(&self) -> &[PinMapping] {
        &self.pins
    }

    /// The event source that started successfully, if any.
    pub fn active_source(&self) -> Option<&'static str> {
        *self.source.read()
    }

    /// Receiver that flips to `true` on shutdown.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Websocket viewer endpoint plus the status surface.
    pub fn router(&self) -> Router {
        let ws_state = WebSocketState::new(
            Arc::clone(&self.registry),
            self.settings,
            self.shutdown_signal(),
        );
        let status = StatusHandlers::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.input_handler),
            Arc::clone(&self.pins),
            Arc::clone(&self.source),
        );

        Router::new()
            .merge(websocket_router().with_state(ws_state))
            .merge(status_routes(status))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
    }

    /// Start an event source feeding this relay's input path.
    ///
    /// A source that cannot configure its pins fails startup.
    pub async fn start_source(&self, source: &dyn EventSource) -> Result<(), StartupError> {
        let sink: Arc<dyn TransitionSink> = Arc::clone(&self.input_handler) as _;
        source
            .start(sink, self.shutdown_signal())
            .await
            .map_err(|source_error| StartupError::Source {
                name: source.name(),
                source: source_error,
            })?;
        *self.source.write() = Some(source.name());

        tracing::info!(source = source.name(), pins = self.pins.len(), "Event source started");
        Ok(())
    }

    /// Signal shutdown and drop every viewer.
    ///
    /// Returns the number of sessions that were still registered.
    pub fn shutdown(&self) -> usize {
        self.shutdown.send_replace(true);
        let closed = self.registry.close_all();
        tracing::info!(closed, "Relay shutting down");
        closed
    }

    /// Serve HTTP and websocket traffic until `signal` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, signal: F) -> Result<(), StartupError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let shutdown = Arc::clone(&self.shutdown);
        let registry = Arc::clone(&self.registry);

        axum::serve(listener, self.router().into_make_service())
            .with_graceful_shutdown(async move {
                signal.await;
                shutdown.send_replace(true);
                let closed = registry.close_all();
                tracing::info!(closed, "Relay shutting down");
            })
            .await
            .map_err(StartupError::Serve)
    }
}

/// Run the relay described by `config` until Ctrl-C or SIGTERM.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    config.validate()?;
    let relay = Relay::from_config(&config)?;

    let source: Arc<dyn EventSource> = match config.source.kind {
        SourceKind::Sysfs => Arc::new(SysfsGpioSource::new(
            config.source.gpio_root.clone(),
            relay.pins().to_vec(),
            config.source.poll_interval(),
        )),
        SourceKind::Simulated => Arc::new(SimulatedSource::new()),
    };
    relay.start_source(source.as_ref()).await?;

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    tracing::info!(
        %addr,
        source = source.name(),
        window_ms = config.debounce.window_ms,
        "Button relay listening"
    );

    relay.serve(listener, shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
