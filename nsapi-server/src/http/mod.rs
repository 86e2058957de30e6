//! HTTP server layer
//!
//! Axum server with:
//! - CORS (off unless origins are configured)
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use axum::http::HeaderValue;
pub use server::{build_router, parse_origin, run_server, AppState, ServerConfig, ServerError};
