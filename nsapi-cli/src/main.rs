//! nsapi CLI - HTTP query service over the neuroscience study database
//!
//! Subcommands:
//! - `serve`: run the read-only HTTP API
//! - `check`: run store diagnostics once and print the report

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::{check::CheckArgs, serve::ServeArgs};
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "nsapi",
    author,
    version,
    about = "Read-only study lookups by term and coordinate"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Query the store once and print diagnostics as JSON
    Check(CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; explicit environment always wins
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Check(args) => commands::run_check(args).await?,
    }

    Ok(())
}
