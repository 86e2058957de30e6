//! Study store - read-only queries over the `ns` schema
//!
//! Tables consumed (owned elsewhere):
//! - `ns.annotations_terms(study_id, contrast_id, term, weight)`
//! - `ns.coordinates(study_id, geom)` with a 3D point geometry
//! - `ns.metadata(study_id, ...)`

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryScalar;
use sqlx::{Acquire, PgPool, Postgres, Transaction};

use super::{ConnectionManager, DbError};
use crate::models::{Coordinate, Diagnostics};

/// Dialect reported by the diagnostics endpoint.
pub const POSTGRES_DIALECT: &str = "postgresql";

/// Store client injected into the HTTP layer.
///
/// Every lookup returns distinct study ids in the order the store produced
/// them. An empty list means no match, not an error.
#[async_trait]
pub trait StudyStore: Send + Sync {
    /// Name of the backing SQL dialect.
    fn dialect(&self) -> &'static str;

    /// Studies annotated with `term`.
    async fn studies_for_term(&self, term: &str) -> Result<Vec<i64>, DbError>;

    /// Studies reporting a coordinate exactly at `at`.
    async fn studies_at(&self, at: Coordinate) -> Result<Vec<i64>, DbError>;

    /// Studies annotated with `term` but not with `excluded`.
    async fn studies_for_term_without(
        &self,
        term: &str,
        excluded: &str,
    ) -> Result<Vec<i64>, DbError>;

    /// Studies reporting `at` but not `excluded`.
    async fn studies_at_without(
        &self,
        at: Coordinate,
        excluded: Coordinate,
    ) -> Result<Vec<i64>, DbError>;

    /// Server version, table counts and a few sample rows.
    async fn diagnostics(&self) -> Result<Diagnostics, DbError>;
}

const TERM_STUDIES: &str = r#"
    SELECT DISTINCT study_id::bigint
    FROM ns.annotations_terms
    WHERE term = $1
"#;

const LOCATION_STUDIES: &str = r#"
    SELECT DISTINCT study_id::bigint
    FROM ns.coordinates
    WHERE ST_X(geom) = $1 AND ST_Y(geom) = $2 AND ST_Z(geom) = $3
"#;

const TERM_DISSOCIATION: &str = r#"
    SELECT DISTINCT study_id::bigint
    FROM ns.annotations_terms
    WHERE term = $1
    AND study_id NOT IN (
        SELECT study_id FROM ns.annotations_terms WHERE term = $2
    )
"#;

const LOCATION_DISSOCIATION: &str = r#"
    SELECT DISTINCT study_id::bigint
    FROM ns.coordinates
    WHERE ST_X(geom) = $1 AND ST_Y(geom) = $2 AND ST_Z(geom) = $3
    AND study_id NOT IN (
        SELECT study_id FROM ns.coordinates
        WHERE ST_X(geom) = $4 AND ST_Y(geom) = $5 AND ST_Z(geom) = $6
    )
"#;

const COORDINATES_SAMPLE: &str = r#"
    SELECT to_jsonb(s) FROM (
        SELECT study_id, ST_X(geom) AS x, ST_Y(geom) AS y, ST_Z(geom) AS z
        FROM ns.coordinates LIMIT 3
    ) s
"#;

const METADATA_SAMPLE: &str = r#"
    SELECT to_jsonb(s) FROM (SELECT * FROM ns.metadata LIMIT 3) s
"#;

const ANNOTATIONS_TERMS_SAMPLE: &str = r#"
    SELECT to_jsonb(s) FROM (
        SELECT study_id, contrast_id, term, weight
        FROM ns.annotations_terms LIMIT 3
    ) s
"#;

/// Statements run by the diagnostics report.
///
/// Counts are mandatory; samples are each guarded by a savepoint.
#[derive(Debug, Clone, Copy)]
struct DiagnosticQueries {
    coordinates_count: &'static str,
    metadata_count: &'static str,
    annotations_terms_count: &'static str,
    coordinates_sample: &'static str,
    metadata_sample: &'static str,
    annotations_terms_sample: &'static str,
}

const NS_DIAGNOSTICS: DiagnosticQueries = DiagnosticQueries {
    coordinates_count: "SELECT COUNT(*) FROM ns.coordinates",
    metadata_count: "SELECT COUNT(*) FROM ns.metadata",
    annotations_terms_count: "SELECT COUNT(*) FROM ns.annotations_terms",
    coordinates_sample: COORDINATES_SAMPLE,
    metadata_sample: METADATA_SAMPLE,
    annotations_terms_sample: ANNOTATIONS_TERMS_SAMPLE,
};

type StudyIdQuery<'q> = QueryScalar<'q, Postgres, i64, PgArguments>;

/// PostgreSQL/PostGIS implementation of [`StudyStore`].
#[derive(Debug)]
pub struct PgStudyStore {
    connections: ConnectionManager,
}

impl PgStudyStore {
    pub fn new(connections: ConnectionManager) -> Self {
        Self { connections }
    }

    /// Run a `SELECT DISTINCT study_id` query in its own transaction.
    async fn study_ids(&self, query: StudyIdQuery<'_>) -> Result<Vec<i64>, DbError> {
        let mut tx = self.connections.pool()?.begin().await?;
        let ids = query.fetch_all(&mut *tx).await?;
        tx.commit().await?;
        Ok(ids)
    }
}

fn bind_coordinate<'q>(query: StudyIdQuery<'q>, at: Coordinate) -> StudyIdQuery<'q> {
    let (x, y, z) = at.as_f64();
    query.bind(x).bind(y).bind(z)
}

/// Fetch sample rows inside a savepoint.
///
/// A failure rolls back to the savepoint and yields an empty sample, leaving
/// the outer transaction usable for the remaining queries.
async fn sample(tx: &mut Transaction<'_, Postgres>, sql: &'static str, table: &str) -> Vec<Value> {
    let result: Result<Vec<Value>, sqlx::Error> = async {
        let mut savepoint = (&mut *tx).begin().await?;
        let rows: Vec<Value> = sqlx::query_scalar(sql).fetch_all(&mut *savepoint).await?;
        savepoint.commit().await?;
        Ok(rows)
    }
    .await;

    result.unwrap_or_else(|e| {
        tracing::warn!(table, error = %e, "sample query failed");
        Vec::new()
    })
}

async fn count(tx: &mut Transaction<'_, Postgres>, sql: &'static str) -> Result<i64, DbError> {
    Ok(sqlx::query_scalar(sql).fetch_one(&mut **tx).await?)
}

#[async_trait]
impl StudyStore for PgStudyStore {
    fn dialect(&self) -> &'static str {
        POSTGRES_DIALECT
    }

    async fn studies_for_term(&self, term: &str) -> Result<Vec<i64>, DbError> {
        self.study_ids(sqlx::query_scalar(TERM_STUDIES).bind(term))
            .await
    }

    async fn studies_at(&self, at: Coordinate) -> Result<Vec<i64>, DbError> {
        self.study_ids(bind_coordinate(sqlx::query_scalar(LOCATION_STUDIES), at))
            .await
    }

    async fn studies_for_term_without(
        &self,
        term: &str,
        excluded: &str,
    ) -> Result<Vec<i64>, DbError> {
        let query = sqlx::query_scalar(TERM_DISSOCIATION).bind(term).bind(excluded);
        self.study_ids(query).await
    }

    async fn studies_at_without(
        &self,
        at: Coordinate,
        excluded: Coordinate,
    ) -> Result<Vec<i64>, DbError> {
        let query = sqlx::query_scalar(LOCATION_DISSOCIATION);
        let query = bind_coordinate(bind_coordinate(query, at), excluded);
        self.study_ids(query).await
    }

    async fn diagnostics(&self) -> Result<Diagnostics, DbError> {
        collect_diagnostics(self.connections.pool()?, &NS_DIAGNOSTICS).await
    }
}

/// Version and counts fail the whole report; samples degrade to `[]`.
async fn collect_diagnostics(
    pool: &PgPool,
    queries: &DiagnosticQueries,
) -> Result<Diagnostics, DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SET search_path TO ns, public")
        .execute(&mut *tx)
        .await?;
    let version: String = sqlx::query_scalar("SELECT version()")
        .fetch_one(&mut *tx)
        .await?;

    let coordinates_count = count(&mut tx, queries.coordinates_count).await?;
    let metadata_count = count(&mut tx, queries.metadata_count).await?;
    let annotations_terms_count = count(&mut tx, queries.annotations_terms_count).await?;

    let coordinates_sample = sample(&mut tx, queries.coordinates_sample, "coordinates").await;
    let metadata_sample = sample(&mut tx, queries.metadata_sample, "metadata").await;
    let annotations_terms_sample =
        sample(&mut tx, queries.annotations_terms_sample, "annotations_terms").await;

    tx.commit().await?;

    Ok(Diagnostics {
        version,
        coordinates_count,
        metadata_count,
        annotations_terms_count,
        coordinates_sample,
        metadata_sample,
        annotations_terms_sample,
    })
}
