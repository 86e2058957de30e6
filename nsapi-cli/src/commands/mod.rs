//! Command implementations for the nsapi CLI

pub mod check;
pub mod serve;

use anyhow::{Context, Result};
use clap::Args;
use nsapi_server::{ConnectionManager, PgStudyStore};

pub use check::run_check;
pub use serve::run_serve;

/// Database connection arguments shared by commands that touch the store
#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// Database URL (postgres:// is accepted and rewritten to postgresql://)
    #[arg(long, env = "DB_URL", hide_env_values = true)]
    pub db_url: Option<String>,
}

impl DatabaseArgs {
    /// Build the store. A missing URL is fatal; connecting is deferred to the
    /// first query.
    pub fn store(&self) -> Result<PgStudyStore> {
        let url = self
            .db_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .context("DB_URL not set. Set via --db-url, DB_URL env, or a .env file")?;

        let connections = ConnectionManager::new(url);
        connections
            .pool()
            .context("Failed to configure database pool")?;

        Ok(PgStudyStore::new(connections))
    }
}
