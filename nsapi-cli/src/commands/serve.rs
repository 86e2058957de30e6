//! HTTP server command
//!
//! Runs the study query API until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use nsapi_server::http::{parse_origin, HeaderValue};
use nsapi_server::{run_server, AppState, ServerConfig};

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3030)
    #[arg(long, short = 'b', env = "NSAPI_BIND", default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Origin allowed cross-origin access (repeatable or comma-separated)
    #[arg(
        long = "cors-origin",
        env = "NSAPI_CORS_ORIGINS",
        value_delimiter = ',',
        value_parser = parse_origin
    )]
    pub cors_origins: Vec<HeaderValue>,

    /// Image served at /img
    #[arg(long, env = "NSAPI_IMAGE", default_value = "assets/amygdala.gif")]
    pub image: PathBuf,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let store = args.database.store()?;

    if !args.image.is_file() {
        tracing::warn!(path = %args.image.display(), "image not found, /img will return 404");
    }

    tracing::info!("Starting nsapi server on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        cors_origins: args.cors_origins,
        image_path: args.image,
    };

    // Run server (blocks until shutdown)
    run_server(AppState::new(store), config)
        .await
        .context("Server error")?;

    Ok(())
}
