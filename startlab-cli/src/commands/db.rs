//! Schema and seed commands

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use startlab_server::db::{migrations, seed};

/// Arguments shared by `migrate` and `seed`
#[derive(Parser, Debug)]
pub struct DbArgs {
    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Create missing tables and indexes
pub async fn run_migrate(config_path: Option<&Path>, args: DbArgs) -> Result<()> {
    let config = super::load_config(config_path, args.database_url)?;
    let pool = super::connect(&config).await?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;
    println!("Schema is up to date ({} statements)", migrations::statements().count());
    Ok(())
}

/// Migrate, then insert seed rows that are not present yet
pub async fn run_seed(config_path: Option<&Path>, args: DbArgs) -> Result<()> {
    let config = super::load_config(config_path, args.database_url)?;
    let pool = super::connect(&config).await?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;
    let report = seed::run(&pool).await.context("Failed to seed database")?;

    println!(
        "Seeded {} FAQ entries, {} partners, {} forms, {} questions",
        report.faqs, report.partners, report.forms, report.questions
    );
    Ok(())
}
