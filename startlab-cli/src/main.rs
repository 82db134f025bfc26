//! startlab CLI - runs and maintains the StartLab intake backend
//!
//! - `serve`: HTTP API (runs migrations first)
//! - `migrate`: create missing tables and indexes
//! - `seed`: demo content and the application questionnaire
//! - `hash`: canonical JSON and content hash of a payload file

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "startlab",
    author,
    version,
    about = "StartLab competition backend: content API and application intake",
    long_about = "Serve the StartLab HTTP API, manage its PostgreSQL schema, and compute \
                  the content hashes that tie stored application rows together."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// TOML config file (defaults are used when absent)
    #[arg(long, global = true, env = "STARTLAB_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create missing tables and indexes
    Migrate(commands::db::DbArgs),
    /// Insert demo content and the questionnaire (idempotent)
    Seed(commands::db::DbArgs),
    /// Print the canonical JSON and SHA-256 of a payload file
    Hash(commands::hash::HashArgs),
    /// Print the effective configuration (secrets redacted)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    startlab_core::config::load_dotenv();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Serve(args) => commands::run_serve(config_path, args).await?,
        Commands::Migrate(args) => commands::run_migrate(config_path, args).await?,
        Commands::Seed(args) => commands::run_seed(config_path, args).await?,
        Commands::Hash(args) => commands::run_hash(args)?,
        Commands::Config => commands::run_config(config_path)?,
    }
    Ok(())
}
