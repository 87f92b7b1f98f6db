//! Database connection pool management
//!
//! Uses sqlx PgPool with an explicit connection limit. The pool is probed
//! once at startup; a failed probe is fatal to the caller.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

use super::DbError;
use crate::config::DatabaseConfig;

/// Translate configuration into driver connect options.
///
/// With a CA certificate the server must present a certificate signed by
/// it; without one TLS is attempted but not required.
pub fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .database(&config.database);

    if let Some(password) = &config.password {
        options = options.password(password);
    }

    match &config.ssl_root_cert {
        Some(cert) => options.ssl_mode(PgSslMode::VerifyCa).ssl_root_cert(cert),
        None => options.ssl_mode(PgSslMode::Prefer),
    }
}

/// Create a PostgreSQL connection pool and verify connectivity.
///
/// # Errors
///
/// Returns an error if no connection can be established within
/// `connect_timeout` or the probe query fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DatabaseConfig::default()).await?;
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DbError> {
    let pool = create_pool_with_options(
        connect_options(config),
        config.max_connections,
        config.connect_timeout,
    )
    .await?;

    probe(&pool).await?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        max_connections = config.max_connections,
        "Connected to database"
    );

    Ok(pool)
}

/// Create a PostgreSQL connection pool with custom options.
pub async fn create_pool_with_options(
    options: PgConnectOptions,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Round-trip a trivial query.
pub async fn probe(pool: &PgPool) -> Result<(), DbError> {
    let _: i32 = sqlx::query_scalar("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn options_follow_config() {
        let config = DatabaseConfig {
            host: "db.internal".into(),
            port: 6543,
            user: "fleet".into(),
            database: "registry".into(),
            ..Default::default()
        };
        let options = connect_options(&config);

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "fleet");
        assert_eq!(options.get_database(), Some("registry"));
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Prefer));
    }

    #[test]
    fn ca_certificate_requires_verification() {
        let config = DatabaseConfig {
            ssl_root_cert: Some(PathBuf::from("/etc/ssl/db-ca.pem")),
            ..Default::default()
        };
        let options = connect_options(&config);
        assert!(matches!(options.get_ssl_mode(), PgSslMode::VerifyCa));
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p vehiclectl-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_pool_access() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let options: PgConnectOptions = url.parse().expect("invalid DATABASE_URL");
        let pool = create_pool_with_options(options, 10, Duration::from_secs(5))
            .await
            .expect("pool creation failed");
        probe(&pool).await.expect("probe failed");

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let n: i32 = sqlx::query_scalar("SELECT $1::int")
                        .bind(i)
                        .fetch_one(&pool)
                        .await
                        .expect("concurrent query failed");
                    n
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.await.expect("task panicked");
            assert_eq!(result, i as i32);
        }
    }
}
