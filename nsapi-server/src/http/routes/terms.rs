//! Term lookup endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use super::require_studies;
use crate::http::error::ApiError;
use crate::http::extractors::ValidTerm;
use crate::http::server::AppState;
use crate::models::TermStudies;

/// GET /terms/{term}/studies - studies annotated with a term
async fn studies_by_term(
    State(state): State<Arc<AppState>>,
    ValidTerm(term): ValidTerm,
) -> Result<Json<TermStudies>, ApiError> {
    let study_ids = require_studies(state.store.studies_for_term(&term), || {
        format!("Term '{}' not found.", term)
    })
    .await?;

    Ok(Json(TermStudies { term, study_ids }))
}

/// Term routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/terms/{term}/studies", get(studies_by_term))
}
