//! Command implementations for vehiclectl CLI

pub mod migrate;
pub mod serve;

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use vehiclectl_server::config::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_CONNECTIONS};
use vehiclectl_server::DatabaseConfig;

pub use migrate::run_migrate;
pub use serve::run_serve;

/// PostgreSQL connection flags shared by every command
#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database name
    #[arg(long, env = "DB_NAME", default_value = "vehicles")]
    pub db_name: String,

    /// CA certificate for TLS; when set the server certificate is verified
    #[arg(long, env = "DB_SSL_CA")]
    pub db_ssl_ca: Option<PathBuf>,

    /// Maximum pooled connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub db_max_connections: u32,

    /// Seconds to wait for a database connection
    #[arg(long, env = "DB_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT.as_secs())]
    pub db_connect_timeout: u64,
}

impl DbArgs {
    pub fn to_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
            ssl_root_cert: self.db_ssl_ca.clone(),
            max_connections: self.db_max_connections,
            connect_timeout: Duration::from_secs(self.db_connect_timeout),
        }
    }
}
