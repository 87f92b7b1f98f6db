//! Schema bootstrap for the registry tables
//!
//! Idempotent: every statement is `IF NOT EXISTS`. Vehicle references are
//! plain columns without foreign keys, so a vehicle can outlive its owner
//! or registration; joined reads then skip it.

use sqlx::PgPool;

use super::DbError;

/// Create tables and indexes if they are missing
pub async fn migrate(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running schema migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS owners (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS registrations (
            id BIGSERIAL PRIMARY KEY,
            plate_number VARCHAR(20) NOT NULL,
            state VARCHAR(50) NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Plates are unique regardless of letter case: `abc123` and `ABC123`
    // are the same plate.
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS registrations_plate_number_ci \
         ON registrations (lower(plate_number))",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vehicles (
            id BIGSERIAL PRIMARY KEY,
            make TEXT NOT NULL,
            model TEXT NOT NULL,
            year INTEGER NOT NULL CHECK (year >= 1886),
            owner_id BIGINT NOT NULL,
            registration_id BIGINT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_vehicles_owner ON vehicles(owner_id)")
        .execute(pool)
        .await?;

    tracing::info!("Schema migrations complete");
    Ok(())
}
