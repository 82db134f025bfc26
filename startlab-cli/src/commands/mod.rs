//! Command implementations for the startlab CLI

pub mod config;
pub mod db;
pub mod hash;
pub mod serve;

pub use config::run_config;
pub use db::{run_migrate, run_seed};
pub use hash::run_hash;
pub use serve::run_serve;

use std::path::Path;

use anyhow::{Context, Result};
use sqlx::PgPool;
use startlab_core::config::DatabaseConfig;
use startlab_core::StartlabConfig;
use startlab_server::db::create_pool;

/// Load configuration; `database_url` replaces any configured database.
pub(crate) fn load_config(
    path: Option<&Path>,
    database_url: Option<String>,
) -> Result<StartlabConfig> {
    let mut config = StartlabConfig::load(path).context("Failed to load configuration")?;
    if let Some(url) = database_url {
        let pool_size = config.database.pool_size;
        config.database = DatabaseConfig::with_url(url);
        config.database.pool_size = pool_size;
    }
    Ok(config)
}

pub(crate) async fn connect(config: &StartlabConfig) -> Result<PgPool> {
    let target = config.database.target()?;
    tracing::info!(db = %target.describe(), "Connecting to database");
    create_pool(&target, config.database.pool_size)
        .await
        .context("Failed to create database pool")
}
