//! Response bodies for the study lookup routes

use serde::Serialize;

use super::Coordinate;

/// GET /terms/{term}/studies
#[derive(Debug, Serialize)]
pub struct TermStudies {
    pub term: String,
    pub study_ids: Vec<i64>,
}

/// GET /locations/{coords}/studies
#[derive(Debug, Serialize)]
pub struct LocationStudies {
    pub coordinates: Coordinate,
    pub study_ids: Vec<i64>,
}

/// GET /dissociate/terms/{a}/{b}
#[derive(Debug, Serialize)]
pub struct TermDissociation {
    pub term_a: String,
    pub term_b: String,
    pub study_ids: Vec<i64>,
}

/// GET /dissociate/locations/{a}/{b}
#[derive(Debug, Serialize)]
pub struct LocationDissociation {
    pub coords_a: Coordinate,
    pub coords_b: Coordinate,
    pub study_ids: Vec<i64>,
}
