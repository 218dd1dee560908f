//! # HTTP Server for the QR Form
//!
//! Serves the form UI and a small JSON API over a single shared
//! [`Controller`].
//!
//! ## Usage
//!
//! ```bash
//! bonqr serve --listen 127.0.0.1:8080 --locations locations.json
//! ```
//!
//! Then open http://localhost:8080 in a browser.

mod handlers;
mod state;
mod static_files;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::clipboard::CommandClipboard;
use crate::controller::Controller;
use crate::error::BonqrError;
use crate::render::PngQrRenderer;

/// Build the router over existing state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Frontend
        .route("/", get(static_files::index_handler))
        .route("/assets/*path", get(static_files::asset_handler))
        // Form API
        .route("/api/state", get(handlers::form::state))
        .route("/api/selection", post(handlers::form::select))
        .route("/api/generate", post(handlers::form::generate))
        .route("/api/copy", post(handlers::form::copy))
        // Locations API
        .route("/api/locations", get(handlers::locations::list))
        // QR API
        .route("/api/qr", get(handlers::qr::display))
        .route("/api/qr.png", get(handlers::qr::png))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use bonqr::locations::LocationSource;
/// use bonqr::render::QrOptions;
/// use bonqr::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), bonqr::error::BonqrError> {
/// let config = ServerConfig {
///     listen_addr: "127.0.0.1:8080".to_string(),
///     locations: LocationSource::parse("locations.json"),
///     clipboard_command: "pbcopy".to_string(),
///     qr: QrOptions::default(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), BonqrError> {
    let clipboard = CommandClipboard::parse(&config.clipboard_command)?;
    let controller = Controller::start(
        &config.locations,
        Arc::new(PngQrRenderer),
        config.qr,
        Arc::new(clipboard),
    )
    .await;

    let app_state = Arc::new(AppState::new(controller));
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            BonqrError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    tracing::info!(
        listen = %config.listen_addr,
        locations = %config.locations,
        "bonqr HTTP server starting, open http://{}/ in your browser",
        config.listen_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| BonqrError::Server(format!("Server error: {}", e)))?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
