//! Store diagnostics report

use serde::Serialize;
use serde_json::Value;

/// Liveness and sample data gathered from the store.
///
/// Counts are mandatory; samples are best-effort and empty when their
/// query failed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub version: String,
    pub coordinates_count: i64,
    pub metadata_count: i64,
    pub annotations_terms_count: i64,
    pub coordinates_sample: Vec<Value>,
    pub metadata_sample: Vec<Value>,
    pub annotations_terms_sample: Vec<Value>,
}

/// Body of a successful GET /test_db
#[derive(Debug, Serialize)]
pub struct DiagnosticsReport {
    pub ok: bool,
    pub dialect: &'static str,
    #[serde(flatten)]
    pub diagnostics: Diagnostics,
}

/// Body of a failed GET /test_db
#[derive(Debug, Serialize)]
pub struct DiagnosticsFailure {
    pub ok: bool,
    pub dialect: &'static str,
    pub error: String,
}
