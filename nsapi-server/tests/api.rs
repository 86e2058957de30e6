//! Router tests for the study query API
//!
//! Drives the full router with an in-memory store, so every route's
//! status codes and bodies are checked without a database.

use std::io::Write;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use nsapi_server::models::{Coordinate, Diagnostics};
use nsapi_server::http::parse_origin;
use nsapi_server::{build_router, AppState, DbError, ServerConfig, StudyStore};
use serde_json::{json, Value};
use tower::ServiceExt;

/// In-memory stand-in for the `ns` schema
struct MemoryStore {
    annotations: Vec<(i64, &'static str)>,
    coordinates: Vec<(i64, Coordinate)>,
}

fn distinct(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut seen = Vec::new();
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

impl MemoryStore {
    fn seeded() -> Self {
        Self {
            annotations: vec![
                (1, "amygdala"),
                (2, "amygdala"),
                (2, "fear"),
                (3, "fear"),
                (1, "amygdala"),
                (4, "memory"),
            ],
            coordinates: vec![
                (10, Coordinate::new(1, 2, 3)),
                (11, Coordinate::new(1, 2, 3)),
                (11, Coordinate::new(-24, -4, 16)),
                (12, Coordinate::new(-24, -4, 16)),
            ],
        }
    }

    fn term_ids(&self, term: &str) -> Vec<i64> {
        distinct(
            self.annotations
                .iter()
                .filter(|(_, t)| *t == term)
                .map(|(id, _)| *id),
        )
    }

    fn location_ids(&self, at: Coordinate) -> Vec<i64> {
        distinct(
            self.coordinates
                .iter()
                .filter(|(_, c)| *c == at)
                .map(|(id, _)| *id),
        )
    }
}

#[async_trait]
impl StudyStore for MemoryStore {
    fn dialect(&self) -> &'static str {
        "memory"
    }

    async fn studies_for_term(&self, term: &str) -> Result<Vec<i64>, DbError> {
        Ok(self.term_ids(term))
    }

    async fn studies_at(&self, at: Coordinate) -> Result<Vec<i64>, DbError> {
        Ok(self.location_ids(at))
    }

    async fn studies_for_term_without(
        &self,
        term: &str,
        excluded: &str,
    ) -> Result<Vec<i64>, DbError> {
        let excluded = self.term_ids(excluded);
        Ok(self
            .term_ids(term)
            .into_iter()
            .filter(|id| !excluded.contains(id))
            .collect())
    }

    async fn studies_at_without(
        &self,
        at: Coordinate,
        excluded: Coordinate,
    ) -> Result<Vec<i64>, DbError> {
        let excluded = self.location_ids(excluded);
        Ok(self
            .location_ids(at)
            .into_iter()
            .filter(|id| !excluded.contains(id))
            .collect())
    }

    async fn diagnostics(&self) -> Result<Diagnostics, DbError> {
        Ok(Diagnostics {
            version: "memory 1.0".into(),
            coordinates_count: self.coordinates.len() as i64,
            metadata_count: 0,
            annotations_terms_count: self.annotations.len() as i64,
            coordinates_sample: self
                .coordinates
                .iter()
                .take(3)
                .map(|(id, c)| json!({ "study_id": id, "x": c.x, "y": c.y, "z": c.z }))
                .collect(),
            metadata_sample: Vec::new(),
            annotations_terms_sample: Vec::new(),
        })
    }
}

/// Store whose every query fails as if the server were gone
struct UnreachableStore;

fn unreachable() -> DbError {
    DbError::Sqlx(sqlx::Error::Protocol("connection refused".into()))
}

#[async_trait]
impl StudyStore for UnreachableStore {
    fn dialect(&self) -> &'static str {
        "postgresql"
    }

    async fn studies_for_term(&self, _: &str) -> Result<Vec<i64>, DbError> {
        Err(unreachable())
    }

    async fn studies_at(&self, _: Coordinate) -> Result<Vec<i64>, DbError> {
        Err(unreachable())
    }

    async fn studies_for_term_without(&self, _: &str, _: &str) -> Result<Vec<i64>, DbError> {
        Err(unreachable())
    }

    async fn studies_at_without(&self, _: Coordinate, _: Coordinate) -> Result<Vec<i64>, DbError> {
        Err(unreachable())
    }

    async fn diagnostics(&self) -> Result<Diagnostics, DbError> {
        Err(unreachable())
    }
}

fn app(store: impl StudyStore + 'static) -> Router {
    build_router(AppState::new(store), &ServerConfig::default())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = app(MemoryStore::seeded())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<p>Server working!</p>");
}

#[tokio::test]
async fn test_image_is_served_as_gif() {
    let mut file = tempfile::Builder::new().suffix(".gif").tempfile().unwrap();
    file.write_all(b"GIF89a").unwrap();

    let config = ServerConfig {
        image_path: file.path().to_path_buf(),
        ..ServerConfig::default()
    };
    let response = build_router(AppState::new(MemoryStore::seeded()), &config)
        .oneshot(Request::builder().uri("/img").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/gif");
}

#[tokio::test]
async fn test_missing_image_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        image_path: dir.path().join("absent.gif"),
        ..ServerConfig::default()
    };
    let response = build_router(AppState::new(MemoryStore::seeded()), &config)
        .oneshot(Request::builder().uri("/img").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_term_studies_are_distinct() {
    let (status, body) = get(app(MemoryStore::seeded()), "/terms/amygdala/studies").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "term": "amygdala", "study_ids": [1, 2] }));
}

#[tokio::test]
async fn test_unknown_term_is_404() {
    let (status, body) = get(app(MemoryStore::seeded()), "/terms/hippocampus/studies").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Term 'hippocampus' not found." }));
}

#[tokio::test]
async fn test_encoded_term_is_decoded() {
    let mut store = MemoryStore::seeded();
    store.annotations.push((7, "working memory"));

    let (status, body) = get(app(store), "/terms/working%20memory/studies").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["term"], json!("working memory"));
    assert_eq!(body["study_ids"], json!([7]));
}

#[tokio::test]
async fn test_undecodable_term_is_json_400() {
    for uri in [
        "/terms/%FF/studies",
        "/dissociate/terms/%FF/fear",
        "/dissociate/terms/fear/%FF",
    ] {
        let (status, body) = get(app(MemoryStore::seeded()), uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            body,
            json!({ "error": "Invalid term format. Use UTF-8 text." }),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn test_location_studies() {
    let (status, body) = get(app(MemoryStore::seeded()), "/locations/1_2_3/studies").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "coordinates": [1, 2, 3], "study_ids": [10, 11] }));
}

#[tokio::test]
async fn test_location_with_negative_axes() {
    let (status, body) = get(app(MemoryStore::seeded()), "/locations/-24_-4_16/studies").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["study_ids"], json!([11, 12]));
}

#[tokio::test]
async fn test_unknown_location_is_404() {
    let (status, body) = get(app(MemoryStore::seeded()), "/locations/0_0_0/studies").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Coordinates [0, 0, 0] not found." }));
}

#[tokio::test]
async fn test_large_coordinate_is_queried() {
    let (status, body) = get(
        app(MemoryStore::seeded()),
        "/locations/3000000000_0_0/studies",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "error": "Coordinates [3000000000, 0, 0] not found." })
    );
}

#[tokio::test]
async fn test_malformed_location_is_400() {
    for uri in ["/locations/a_b_c/studies", "/locations/1_2/studies"] {
        let (status, body) = get(app(MemoryStore::seeded()), uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, json!({ "error": "Invalid coordinates format. Use x_y_z." }));
    }
}

#[tokio::test]
async fn test_malformed_location_skips_store() {
    // Validation runs before the store, so a dead store still yields 400
    let (status, _) = get(app(UnreachableStore), "/locations/x_y_z/studies").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dissociate_terms_excludes_second_term() {
    let store = MemoryStore::seeded();
    let (status, body) = get(app(store), "/dissociate/terms/amygdala/fear").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "term_a": "amygdala", "term_b": "fear", "study_ids": [1] })
    );

    let (_, fear) = get(app(MemoryStore::seeded()), "/terms/fear/studies").await;
    let fear_ids = fear["study_ids"].as_array().unwrap();
    for id in body["study_ids"].as_array().unwrap() {
        assert!(!fear_ids.contains(id));
    }
}

#[tokio::test]
async fn test_dissociate_terms_empty_is_404() {
    let (status, body) = get(app(MemoryStore::seeded()), "/dissociate/terms/fear/fear").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "error": "No studies found for 'fear' without 'fear'." })
    );
}

#[tokio::test]
async fn test_dissociate_locations() {
    let (status, body) = get(
        app(MemoryStore::seeded()),
        "/dissociate/locations/1_2_3/-24_-4_16",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "coords_a": [1, 2, 3], "coords_b": [-24, -4, 16], "study_ids": [10] })
    );
}

#[tokio::test]
async fn test_dissociate_locations_is_not_symmetric() {
    let (_, forward) = get(
        app(MemoryStore::seeded()),
        "/dissociate/locations/1_2_3/-24_-4_16",
    )
    .await;
    let (_, reverse) = get(
        app(MemoryStore::seeded()),
        "/dissociate/locations/-24_-4_16/1_2_3",
    )
    .await;

    assert_eq!(forward["study_ids"], json!([10]));
    assert_eq!(reverse["study_ids"], json!([12]));
}

#[tokio::test]
async fn test_dissociate_locations_empty_is_404() {
    let (status, body) = get(app(MemoryStore::seeded()), "/dissociate/locations/1_2_3/1_2_3").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "error": "No studies found for [1, 2, 3] without [1, 2, 3]." })
    );
}

#[tokio::test]
async fn test_dissociate_locations_bad_second_coordinate_is_400() {
    let (status, _) = get(app(MemoryStore::seeded()), "/dissociate/locations/1_2_3/1_2_x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_failure_is_500_with_message() {
    for uri in [
        "/terms/amygdala/studies",
        "/locations/1_2_3/studies",
        "/dissociate/terms/a/b",
        "/dissociate/locations/1_2_3/4_5_6",
    ] {
        let (status, body) = get(app(UnreachableStore), uri).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert!(
            body["error"].as_str().unwrap().contains("connection refused"),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn test_queries_are_idempotent() {
    let app = app(MemoryStore::seeded());
    let (_, first) = get(app.clone(), "/terms/fear/studies").await;
    let (_, second) = get(app, "/terms/fear/studies").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_db_reports_counts_and_samples() {
    let (status, body) = get(app(MemoryStore::seeded()), "/test_db").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["dialect"], json!("memory"));
    assert_eq!(body["version"], json!("memory 1.0"));
    assert_eq!(body["coordinates_count"], json!(4));
    assert_eq!(body["annotations_terms_count"], json!(6));
    assert_eq!(body["metadata_count"], json!(0));
    assert_eq!(body["coordinates_sample"].as_array().unwrap().len(), 3);
    assert_eq!(body["metadata_sample"], json!([]));
}

#[tokio::test]
async fn test_db_unreachable_is_500() {
    let (status, body) = get(app(UnreachableStore), "/test_db").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["dialect"], json!("postgresql"));
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
    assert!(body.get("version").is_none());
}

async fn allowed_origin(config: &ServerConfig, origin: &str) -> Option<String> {
    let response = build_router(AppState::new(MemoryStore::seeded()), config)
        .oneshot(
            Request::builder()
                .uri("/terms/fear/studies")
                .header(header::ORIGIN, origin)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .map(|v| v.to_str().unwrap().to_string())
}

#[tokio::test]
async fn test_no_cors_headers_by_default() {
    let config = ServerConfig::default();
    assert_eq!(allowed_origin(&config, "http://localhost:3000").await, None);
}

#[tokio::test]
async fn test_configured_cors_origin_is_allowed() {
    let config = ServerConfig {
        cors_origins: vec![parse_origin("https://atlas.example.org").unwrap()],
        ..ServerConfig::default()
    };

    assert_eq!(
        allowed_origin(&config, "https://atlas.example.org").await.as_deref(),
        Some("https://atlas.example.org")
    );
    assert_eq!(allowed_origin(&config, "https://elsewhere.example.org").await, None);
}

#[tokio::test]
async fn test_permissive_cors_allows_any_origin() {
    let config = ServerConfig {
        cors_permissive: true,
        ..ServerConfig::default()
    };

    assert_eq!(
        allowed_origin(&config, "https://elsewhere.example.org").await.as_deref(),
        Some("*")
    );
}
