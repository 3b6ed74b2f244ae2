//! button-relay binary entry point.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use button_relay::application::{self, StartupError};
use button_relay::config::{AppConfig, LogFormat, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("button-relay: {}", StartupError::from(e));
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.server);

    match application::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Button relay failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_thread_ids(true);
    match server.log_format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
