//! Hubhook Web Server - reference receiver for signed webhooks.
//!
//! This binary provides a thin web server that:
//! - Receives webhooks on `/webhooks`
//! - Rejects oversized bodies before verification
//! - Verifies the HMAC signature and logs the outcome

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    routing::{any, get},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hubhook::web::{health, receive_webhook, AppState};
use hubhook::{Config, WebhookVerifier};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "web_server_starting");

    // Load configuration
    let config = Config::from_env();
    let verifier_config = config
        .verifier_config()
        .context("Invalid webhook configuration")?;
    info!(
        port = config.port,
        algorithm = %verifier_config.algorithm,
        signature_header = %verifier_config.signature_header,
        event_header = %verifier_config.event_header,
        delivery_header = %verifier_config.delivery_header,
        max_body_bytes = config.max_body_bytes,
        "config_loaded"
    );

    let state = AppState::new(WebhookVerifier::new(verifier_config), config.max_body_bytes);

    // Any method reaches the handler so non-POST requests get a 405 from the extractor
    let app = Router::new()
        .route("/health", get(health))
        .route("/webhooks", any(receive_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// JSON logs filtered by `RUST_LOG`, defaulting to `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();
}

/// Resolves on SIGINT or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires, so the
/// server keeps running on the other signal.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, signal = "SIGINT", "signal_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, signal = "SIGTERM", "signal_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    };

    info!(signal = received, "web_server_shutting_down");
}
