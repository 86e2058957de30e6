//! Dissociation endpoints - studies matching A but not B

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use super::require_studies;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidCoordinatePair, ValidTermPair};
use crate::http::server::AppState;
use crate::models::{LocationDissociation, TermDissociation};

/// GET /dissociate/terms/{term_a}/{term_b}
async fn dissociate_terms(
    State(state): State<Arc<AppState>>,
    ValidTermPair(term_a, term_b): ValidTermPair,
) -> Result<Json<TermDissociation>, ApiError> {
    let study_ids = require_studies(
        state.store.studies_for_term_without(&term_a, &term_b),
        || format!("No studies found for '{}' without '{}'.", term_a, term_b),
    )
    .await?;

    Ok(Json(TermDissociation {
        term_a,
        term_b,
        study_ids,
    }))
}

/// GET /dissociate/locations/{coords_a}/{coords_b}
async fn dissociate_locations(
    State(state): State<Arc<AppState>>,
    ValidCoordinatePair(coords_a, coords_b): ValidCoordinatePair,
) -> Result<Json<LocationDissociation>, ApiError> {
    let study_ids = require_studies(state.store.studies_at_without(coords_a, coords_b), || {
        format!("No studies found for {} without {}.", coords_a, coords_b)
    })
    .await?;

    Ok(Json(LocationDissociation {
        coords_a,
        coords_b,
        study_ids,
    }))
}

/// Dissociation routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dissociate/terms/{term_a}/{term_b}", get(dissociate_terms))
        .route(
            "/dissociate/locations/{coords_a}/{coords_b}",
            get(dissociate_locations),
        )
}
