//! One-shot store diagnostics
//!
//! Prints the same report as GET /test_db and exits non-zero when the
//! store could not be queried.

use anyhow::{bail, Context, Result};
use clap::Parser;

use nsapi_server::models::{DiagnosticsFailure, DiagnosticsReport};
use nsapi_server::StudyStore;

use super::DatabaseArgs;

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

fn render<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    rendered.context("Failed to serialize diagnostics")
}

/// Run diagnostics against the configured store
pub async fn run_check(args: CheckArgs) -> Result<()> {
    let store = args.database.store()?;
    let dialect = store.dialect();

    match store.diagnostics().await {
        Ok(diagnostics) => {
            let report = DiagnosticsReport {
                ok: true,
                dialect,
                diagnostics,
            };
            println!("{}", render(&report, args.compact)?);
            Ok(())
        }
        Err(e) => {
            let failure = DiagnosticsFailure {
                ok: false,
                dialect,
                error: e.to_string(),
            };
            println!("{}", render(&failure, args.compact)?);
            bail!("store diagnostics failed: {}", e)
        }
    }
}
