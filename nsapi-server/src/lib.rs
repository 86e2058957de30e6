//! nsapi-server: read-only HTTP queries over the neuroscience study database
//!
//! Answers which studies mention a term, which report activation at a
//! coordinate, and set-difference variants of both.

pub mod db;
pub mod http;
pub mod models;

pub use db::{ConnectionManager, DbError, PgStudyStore, StudyStore};
pub use http::{build_router, run_server, AppState, ServerConfig};
