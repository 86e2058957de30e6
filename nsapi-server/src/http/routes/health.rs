//! Liveness and static asset endpoints

use std::path::Path;

use axum::{response::Html, routing::get, Router};
use tower_http::services::ServeFile;

/// GET /
async fn health() -> Html<&'static str> {
    Html("<p>Server working!</p>")
}

/// Health routes. `/img` serves the file at `image`; its MIME type is
/// guessed from the extension and a missing file yields 404.
pub fn router<S>(image: &Path) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(health))
        .route_service("/img", ServeFile::new(image))
}
