//! Server initialization and routing

use crate::config::WebConfig;
use crate::routes::{health, not_found, pets};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Multipart framing and the metadata field on top of the photo itself.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the Axum router with all pages and middleware
///
/// HTML forms can only send GET and POST, so updates and deletes are also
/// reachable through POST routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_bytes() + UPLOAD_OVERHEAD_BYTES;

    let upload_routes = Router::new()
        .route("/pets/{id}/photo", post(pets::upload_photo))
        .layer(DefaultBodyLimit::max(upload_limit));

    Router::new()
        .route("/", get(pets::index))
        .route("/health", get(health::health_check))
        .route("/pets", post(pets::store))
        .route("/pets/create", get(pets::create_form))
        .route(
            "/pets/{id}",
            get(pets::show)
                .put(pets::update)
                .post(pets::update)
                .delete(pets::destroy),
        )
        .route("/pets/{id}/edit", get(pets::edit))
        .route("/pets/{id}/delete", post(pets::destroy))
        .merge(upload_routes)
        .fallback(not_found)
        // Upstream calls have their own timeout; this one bounds the whole request.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout() * 2,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the front-end HTTP server
///
/// Sets up JSON logging, builds the gateway and serves until SIGTERM or
/// Ctrl+C. Missing upstream settings do not stop the server; every page
/// reports them instead.
pub async fn start_server(config: WebConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .json()
        .init();

    let state = Arc::new(AppState::new(config.clone())?);
    if !state.gateway.is_configured() {
        for problem in state.gateway.configuration_errors() {
            tracing::warn!("{problem}");
        }
    }

    let app = build_router(state);
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        "Starting petstore front end on {} (upstream: {})",
        addr,
        config.base_url.as_deref().unwrap_or("<unset>")
    );
    tracing::info!(
        "Upstream timeout: {}s, Max photo: {}MB",
        config.timeout_secs,
        config.max_upload_mb
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
