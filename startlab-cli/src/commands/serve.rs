//! HTTP server command

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use startlab_server::db::migrations;
use startlab_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: HOST:PORT from config, 127.0.0.1:8000)
    #[arg(long, short = 'b', env = "STARTLAB_BIND")]
    pub bind: Option<SocketAddr>,

    /// Allow any CORS origin regardless of ALLOWED_ORIGINS - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Do not run migrations before serving
    #[arg(long)]
    pub skip_migrations: bool,
}

/// Run the HTTP server
pub async fn run_serve(config_path: Option<&Path>, args: ServeArgs) -> Result<()> {
    let config = super::load_config(config_path, args.database_url)?;

    let bind_addr = match args.bind {
        Some(addr) => addr,
        None => config
            .server
            .bind_address()
            .parse()
            .with_context(|| format!("Invalid HOST/PORT: {}", config.server.bind_address()))?,
    };

    let pool = super::connect(&config).await?;
    if args.skip_migrations {
        tracing::info!("Skipping migrations");
    } else {
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    let server = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive,
    };

    run_server(pool, config, server)
        .await
        .context("Server error")?;

    Ok(())
}
