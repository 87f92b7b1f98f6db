//! HTTP server command

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use vehiclectl_server::db::{create_pool, migrate, PgStore};
use vehiclectl_server::http::{run_server, AppState};
use vehiclectl_server::ServerConfig;

use super::DbArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Interface to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Create missing tables before serving
    #[arg(long)]
    pub migrate: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db_config = args.db.to_config();
    tracing::debug!(config = ?db_config, "Database settings");

    // Fail fast: no pool, no server.
    let pool = create_pool(&db_config)
        .await
        .context("Failed to connect to the database")?;

    if args.migrate {
        migrate(&pool).await.context("Failed to apply schema")?;
    }

    let config = ServerConfig {
        bind_addr: SocketAddr::new(args.host, args.port),
    };
    let state = AppState::new(Arc::new(PgStore::new(pool.clone())));

    let served = run_server(state, config).await.context("Server error");

    pool.close().await;
    tracing::info!("Database pool closed");
    served
}
