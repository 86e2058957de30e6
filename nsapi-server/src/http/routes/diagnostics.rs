//! Store diagnostics endpoint
//!
//! GET /test_db - server version, table counts and sample rows.
//! Counts are required; a failed sample shows up as an empty list.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::http::server::AppState;
use crate::models::{DiagnosticsFailure, DiagnosticsReport};

/// GET /test_db
async fn test_db(State(state): State<Arc<AppState>>) -> Response {
    let dialect = state.store.dialect();

    match state.store.diagnostics().await {
        Ok(diagnostics) => (
            StatusCode::OK,
            Json(DiagnosticsReport {
                ok: true,
                dialect,
                diagnostics,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "diagnostics failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DiagnosticsFailure {
                    ok: false,
                    dialect,
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Diagnostics routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/test_db", get(test_db))
}
