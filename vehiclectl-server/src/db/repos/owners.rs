//! Owner repository
//!
//! Natural key: `name`.

use sqlx::{FromRow, PgPool};

use super::{is_unique_violation, INSERT_ATTEMPTS};
use crate::db::{Created, DbError, Updated};
use crate::models::{Owner, OwnerInput};

/// Row produced by the insert-or-fetch statement
#[derive(Debug, FromRow)]
struct InsertedOwner {
    #[sqlx(flatten)]
    owner: Owner,
    created: bool,
}

/// Owner repository
pub struct OwnerRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> OwnerRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an owner unless the name is taken.
    ///
    /// Single statement: the CTE inserts with ON CONFLICT DO NOTHING, and the
    /// UNION branch returns the existing row when nothing was inserted.
    pub async fn create(&self, input: &OwnerInput) -> Result<Created<Owner>, DbError> {
        for _ in 0..INSERT_ATTEMPTS {
            let row: Option<InsertedOwner> = sqlx::query_as(
                r#"
                WITH inserted AS (
                    INSERT INTO owners (name) VALUES ($1)
                    ON CONFLICT (name) DO NOTHING
                    RETURNING id, name
                )
                SELECT id, name, TRUE AS created FROM inserted
                UNION ALL
                SELECT id, name, FALSE AS created FROM owners WHERE name = $1
                LIMIT 1
                "#,
            )
            .bind(&input.name)
            .fetch_optional(self.pool)
            .await?;

            match row {
                Some(r) if r.created => return Ok(Created::New(r.owner.id)),
                Some(r) => return Ok(Created::Existing(r.owner)),
                None => continue,
            }
        }

        Err(DbError::InsertContended {
            table: "owners",
            attempts: INSERT_ATTEMPTS,
        })
    }

    /// All owners, oldest first.
    pub async fn list(&self) -> Result<Vec<Owner>, DbError> {
        let owners = sqlx::query_as("SELECT id, name FROM owners ORDER BY id")
            .fetch_all(self.pool)
            .await?;
        Ok(owners)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Owner>, DbError> {
        let owner = sqlx::query_as("SELECT id, name FROM owners WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(owner)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Owner>, DbError> {
        let owner = sqlx::query_as("SELECT id, name FROM owners WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool)
            .await?;
        Ok(owner)
    }

    /// Overwrite the name of owner `id`.
    pub async fn update(&self, id: i64, input: &OwnerInput) -> Result<Updated<Owner>, DbError> {
        let result = sqlx::query("UPDATE owners SET name = $1 WHERE id = $2")
            .bind(&input.name)
            .bind(id)
            .execute(self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Ok(Updated::Missing),
            Ok(_) => Ok(Updated::Applied),
            Err(e) if is_unique_violation(&e) => match self.find_by_name(&input.name).await? {
                Some(existing) => Ok(Updated::Conflict(existing)),
                None => Err(e.into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let done = sqlx::query("DELETE FROM owners WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}
