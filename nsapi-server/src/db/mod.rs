//! Database layer - connection management and the study store
//!
//! # Design Principles
//!
//! - One shared pool per process, created lazily
//! - Read-only: every statement is a parameterized `SELECT`
//! - Each request runs in its own transaction

pub mod pool;
pub mod store;

pub use pool::{normalize_database_url, ConnectionManager};
pub use store::{PgStudyStore, StudyStore};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{0}")]
    Sqlx(#[from] sqlx::Error),
}
