//! Database connection management
//!
//! A single sqlx `PgPool` is built on first use and shared for the rest of
//! the process. Connections are pinged before being handed out so a dropped
//! server-side connection is replaced instead of surfacing as a query error.

use once_cell::sync::OnceCell;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::DbError;

const LEGACY_SCHEME: &str = "postgres://";
const SCHEME: &str = "postgresql://";

/// Rewrite the deprecated `postgres://` scheme to `postgresql://`.
///
/// Any other URL is returned unchanged.
pub fn normalize_database_url(url: &str) -> String {
    match url.strip_prefix(LEGACY_SCHEME) {
        Some(rest) => format!("{SCHEME}{rest}"),
        None => url.to_string(),
    }
}

/// Lazily constructed, process-wide connection pool.
///
/// Construction does no I/O. The pool itself is created on the first call to
/// [`ConnectionManager::pool`] and reused afterwards.
#[derive(Debug)]
pub struct ConnectionManager {
    database_url: String,
    pool: OnceCell<PgPool>,
}

impl ConnectionManager {
    pub fn new(database_url: &str) -> Self {
        Self {
            database_url: normalize_database_url(database_url),
            pool: OnceCell::new(),
        }
    }

    /// The normalized connection string.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Get the shared pool, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be parsed. Connecting
    /// itself is deferred to the first query.
    pub fn pool(&self) -> Result<&PgPool, DbError> {
        self.pool.get_or_try_init(|| {
            tracing::debug!("initializing database pool");
            PgPoolOptions::new()
                .test_before_acquire(true)
                .connect_lazy(&self.database_url)
                .map_err(DbError::from)
        })
    }
}
