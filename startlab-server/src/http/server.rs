//! Axum server setup
//!
//! - CORS from `ALLOWED_ORIGINS` (any origin when empty or permissive)
//! - Request tracing and a per-request timeout
//! - Static media under `/media`
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method, StatusCode};
use axum::Router;
use sqlx::PgPool;
use startlab_core::{MediaUrls, StartlabConfig};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::routes;

/// Listener settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000)
    pub bind_addr: SocketAddr,

    /// Allow any origin regardless of `ALLOWED_ORIGINS`
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cors_permissive: false,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub pool: PgPool,
    pub config: StartlabConfig,
    pub media: MediaUrls,
}

impl AppState {
    pub fn new(pool: PgPool, config: StartlabConfig) -> Self {
        let media = MediaUrls::new(config.media.base_url.clone());
        Self {
            pool,
            config,
            media,
        }
    }
}

fn cors_layer(origins: &[String], permissive: bool) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    if permissive || origins.is_empty() || origins.iter().any(|o| o == "*") {
        if permissive {
            tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        }
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(methods)
        .allow_headers(Any)
}

/// Requests running longer than `timeout` get 408.
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// Build the full router with middleware.
pub fn build_router(state: Arc<AppState>, cors_permissive: bool) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins, cors_permissive);
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let media_dir = state.config.media.dir.clone();

    Router::new()
        .merge(routes::meta::router())
        .merge(routes::faqs::router())
        .merge(routes::news::router())
        .merge(routes::partners::router())
        .merge(routes::catalogue::router())
        .merge(routes::intake::router())
        .merge(routes::diagnostics::router())
        .merge(routes::documents::router())
        .nest_service("/media", ServeDir::new(media_dir))
        .layer(timeout_layer(timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until a shutdown signal arrives.
pub async fn run_server(
    pool: PgPool,
    config: StartlabConfig,
    server: ServerConfig,
) -> Result<(), ServerError> {
    tracing::info!(
        project = %config.project.name,
        version = %config.project.version,
        environment = %config.environment,
        media_dir = %config.media.dir.display(),
        "Starting server"
    );
    let state = Arc::new(AppState::new(pool, config));
    let app = build_router(state, server.cors_permissive);

    let listener = TcpListener::bind(server.bind_addr).await?;
    tracing::info!("Server listening on {}", server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
