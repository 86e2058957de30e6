//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use super::error::ApiError;
use crate::models::{Coordinate, ValidationError};

fn invalid_term() -> ApiError {
    ApiError::Validation(ValidationError::InvalidFormat {
        field: "term",
        expected: "UTF-8 text",
    })
}

fn invalid_coordinates() -> ApiError {
    ApiError::Validation(ValidationError::InvalidFormat {
        field: "coordinates",
        expected: "x_y_z",
    })
}

/// Extract and validate a single `x_y_z` path segment
pub struct ValidCoordinate(pub Coordinate);

impl<S> FromRequestParts<S> for ValidCoordinate
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid_coordinates())?;

        Ok(Self(Coordinate::parse(&raw)?))
    }
}

/// Extract and validate two `x_y_z` path segments
pub struct ValidCoordinatePair(pub Coordinate, pub Coordinate);

impl<S> FromRequestParts<S> for ValidCoordinatePair
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((a, b)): Path<(String, String)> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid_coordinates())?;

        Ok(Self(Coordinate::parse(&a)?, Coordinate::parse(&b)?))
    }
}

/// Extract a term from path, rejecting undecodable input as JSON
pub struct ValidTerm(pub String);

impl<S> FromRequestParts<S> for ValidTerm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(term): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid_term())?;

        Ok(Self(term))
    }
}

/// Extract two terms from path
pub struct ValidTermPair(pub String, pub String);

impl<S> FromRequestParts<S> for ValidTermPair
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((a, b)): Path<(String, String)> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid_term())?;

        Ok(Self(a, b))
    }
}
