//! Registration repository
//!
//! Natural key: `plate_number`, compared case-insensitively through the
//! unique index on `lower(plate_number)`.

use sqlx::{FromRow, PgPool};

use super::{is_unique_violation, INSERT_ATTEMPTS};
use crate::db::{Created, DbError, Updated};
use crate::models::{Registration, RegistrationInput};

#[derive(Debug, FromRow)]
struct InsertedRegistration {
    #[sqlx(flatten)]
    registration: Registration,
    created: bool,
}

/// Registration repository
pub struct RegistrationRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> RegistrationRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a registration unless the plate is already registered.
    pub async fn create(
        &self,
        input: &RegistrationInput,
    ) -> Result<Created<Registration>, DbError> {
        for _ in 0..INSERT_ATTEMPTS {
            let row: Option<InsertedRegistration> = sqlx::query_as(
                r#"
                WITH inserted AS (
                    INSERT INTO registrations (plate_number, state) VALUES ($1, $2)
                    ON CONFLICT ((lower(plate_number))) DO NOTHING
                    RETURNING id, plate_number, state
                )
                SELECT id, plate_number, state, TRUE AS created FROM inserted
                UNION ALL
                SELECT id, plate_number, state, FALSE AS created
                FROM registrations WHERE lower(plate_number) = lower($1)
                LIMIT 1
                "#,
            )
            .bind(&input.plate_number)
            .bind(&input.state)
            .fetch_optional(self.pool)
            .await?;

            match row {
                Some(r) if r.created => return Ok(Created::New(r.registration.id)),
                Some(r) => return Ok(Created::Existing(r.registration)),
                None => continue,
            }
        }

        Err(DbError::InsertContended {
            table: "registrations",
            attempts: INSERT_ATTEMPTS,
        })
    }

    pub async fn list(&self) -> Result<Vec<Registration>, DbError> {
        let registrations =
            sqlx::query_as("SELECT id, plate_number, state FROM registrations ORDER BY id")
                .fetch_all(self.pool)
                .await?;
        Ok(registrations)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Registration>, DbError> {
        let registration =
            sqlx::query_as("SELECT id, plate_number, state FROM registrations WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(registration)
    }

    pub async fn find_by_plate(&self, plate_number: &str) -> Result<Option<Registration>, DbError> {
        let registration = sqlx::query_as(
            "SELECT id, plate_number, state FROM registrations \
             WHERE lower(plate_number) = lower($1)",
        )
        .bind(plate_number)
        .fetch_optional(self.pool)
        .await?;
        Ok(registration)
    }

    pub async fn update(
        &self,
        id: i64,
        input: &RegistrationInput,
    ) -> Result<Updated<Registration>, DbError> {
        let result =
            sqlx::query("UPDATE registrations SET plate_number = $1, state = $2 WHERE id = $3")
                .bind(&input.plate_number)
                .bind(&input.state)
                .bind(id)
                .execute(self.pool)
                .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Ok(Updated::Missing),
            Ok(_) => Ok(Updated::Applied),
            Err(e) if is_unique_violation(&e) => {
                match self.find_by_plate(&input.plate_number).await? {
                    Some(existing) => Ok(Updated::Conflict(existing)),
                    None => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let done = sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}
