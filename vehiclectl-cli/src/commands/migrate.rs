//! Schema bootstrap command

use anyhow::{Context, Result};
use clap::Parser;

use vehiclectl_server::db::{create_pool, migrate};

use super::DbArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Create the owners, registrations, and vehicles tables if missing
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = create_pool(&args.db.to_config())
        .await
        .context("Failed to connect to the database")?;

    let result = migrate(&pool).await.context("Failed to apply schema");
    pool.close().await;
    result?;

    tracing::info!("Schema is up to date");
    Ok(())
}
