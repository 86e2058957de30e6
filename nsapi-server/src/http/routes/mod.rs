//! Route handlers organized by resource

pub mod diagnostics;
pub mod dissociate;
pub mod health;
pub mod locations;
pub mod terms;

use std::future::Future;

use crate::db::DbError;
use crate::http::error::ApiError;

/// Await a study lookup, turning an empty result into a 404.
///
/// Shared by every study route so the empty/error handling stays identical.
pub(crate) async fn require_studies<F>(
    lookup: F,
    not_found: impl FnOnce() -> String,
) -> Result<Vec<i64>, ApiError>
where
    F: Future<Output = Result<Vec<i64>, DbError>>,
{
    let study_ids = lookup.await?;
    if study_ids.is_empty() {
        return Err(ApiError::not_found(not_found()));
    }
    Ok(study_ids)
}
