//! Axum server setup
//!
//! Server skeleton with:
//! - CORS only for configured origins (none by default)
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::StudyStore;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3030)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false)
    pub cors_permissive: bool,

    /// Origins allowed cross-origin access when not permissive.
    /// Empty means no CORS headers are sent.
    pub cors_origins: Vec<HeaderValue>,

    /// Image served at `/img`
    pub image_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            cors_permissive: false,
            cors_origins: Vec::new(),
            image_path: PathBuf::from("assets/amygdala.gif"),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StudyStore>,
}

impl AppState {
    pub fn new(store: impl StudyStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Parse a `--cors-origin` value.
///
/// `*` is refused; any-origin access goes through `cors_permissive`.
pub fn parse_origin(origin: &str) -> Result<HeaderValue, String> {
    let origin = origin.trim();
    if origin == "*" {
        return Err("use --cors-permissive to allow any origin".to_string());
    }
    HeaderValue::from_str(origin).map_err(|e| format!("invalid origin '{}': {}", origin, e))
}

fn cors_layer(config: &ServerConfig) -> Option<CorsLayer> {
    if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return Some(CorsLayer::permissive());
    }
    if config.cors_origins.is_empty() {
        return None;
    }

    tracing::info!(origins = ?config.cors_origins, "CORS: allowing configured origins");
    Some(
        CorsLayer::new()
            .allow_origin(config.cors_origins.clone())
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

/// Build the application router with all routes
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .merge(routes::health::router(&config.image_path))
        .merge(routes::terms::router())
        .merge(routes::locations::router())
        .merge(routes::dissociate::router())
        .merge(routes::diagnostics::router());

    if let Some(cors) = cors_layer(config) {
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let store = PgStudyStore::new(ConnectionManager::new(&database_url));
/// run_server(AppState::new(store), ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    tracing::info!(image = %config.image_path.display(), "static image configured");
    let app = build_router(state, &config);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
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
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
