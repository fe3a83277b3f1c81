//! Elyx Journey Server — read-only HTTP API over the member journey log.
//!
//! Loads the journey log once at startup and serves it, together with the
//! derived views, until interrupted.
//!
//! Usage:
//!   ELYX_DATA=/path/to/journey_data.json ELYX_BIND=0.0.0.0:8000 elyx-journey-server
//!
//! Or with args:
//!   elyx-journey-server --data /path/to/journey_data.json --bind 127.0.0.1:8000

use clap::Parser;
use elyx_journey_lib::api::{build_router, AppState};
use elyx_journey_lib::config::ServerConfig;
use elyx_journey_lib::journey::Journey;
use elyx_journey_lib::narratives::NarrativeCatalog;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM, waiting for Ctrl-C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("shutdown signal received, draining requests");
}

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();
    init_tracing(config.log_json);

    info!(data = %config.data_path.display(), "loading journey data");
    let journey = Journey::load_or_empty(&config.data_path);

    let narratives = match &config.narratives {
        Some(path) => {
            info!(path = %path.display(), "loading narratives override");
            NarrativeCatalog::from_path(path)
        }
        None => NarrativeCatalog::builtin(),
    };
    let narratives = match narratives {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(error = %e, "failed to load narratives");
            std::process::exit(1);
        }
    };

    info!(origins = ?config.allowed_origins, "CORS origins");
    let app = build_router(AppState::new(journey, narratives), config.allowed_origins.as_slice());

    let listener = match tokio::net::TcpListener::bind(config.bind).await {
        Ok(l) => l,
        Err(e) => {
            error!(bind = %config.bind, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(bind = %config.bind, "listening");
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        std::process::exit(1);
    }
}
