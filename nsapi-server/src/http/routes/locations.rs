//! Coordinate lookup endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use super::require_studies;
use crate::http::error::ApiError;
use crate::http::extractors::ValidCoordinate;
use crate::http::server::AppState;
use crate::models::LocationStudies;

/// GET /locations/{coords}/studies - studies reporting an exact coordinate
async fn studies_by_location(
    State(state): State<Arc<AppState>>,
    ValidCoordinate(coordinates): ValidCoordinate,
) -> Result<Json<LocationStudies>, ApiError> {
    let study_ids = require_studies(state.store.studies_at(coordinates), || {
        format!("Coordinates {} not found.", coordinates)
    })
    .await?;

    Ok(Json(LocationStudies {
        coordinates,
        study_ids,
    }))
}

/// Location routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/locations/{coords}/studies", get(studies_by_location))
}
