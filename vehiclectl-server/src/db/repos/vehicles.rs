//! Vehicle repository
//!
//! Natural key: `registration_id`. Reads return [`VehicleView`] rows built
//! with inner joins, so a vehicle whose owner or registration is gone is
//! not returned.

use sqlx::{FromRow, PgPool};

use super::{is_unique_violation, INSERT_ATTEMPTS};
use crate::db::{Created, DbError, Updated};
use crate::models::{Vehicle, VehicleInput, VehicleView};

const VIEW_SELECT: &str = r#"
    SELECT v.id, v.make, v.model, v.year,
           o.name AS owner_name,
           r.plate_number, r.state
    FROM vehicles v
    JOIN owners o ON v.owner_id = o.id
    JOIN registrations r ON v.registration_id = r.id
"#;

#[derive(Debug, FromRow)]
struct InsertedVehicle {
    #[sqlx(flatten)]
    vehicle: Vehicle,
    created: bool,
}

/// Vehicle repository
pub struct VehicleRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> VehicleRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a vehicle unless its registration is already in use.
    pub async fn create(&self, input: &VehicleInput) -> Result<Created<Vehicle>, DbError> {
        for _ in 0..INSERT_ATTEMPTS {
            let row: Option<InsertedVehicle> = sqlx::query_as(
                r#"
                WITH inserted AS (
                    INSERT INTO vehicles (make, model, year, owner_id, registration_id)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (registration_id) DO NOTHING
                    RETURNING id, make, model, year, owner_id, registration_id
                )
                SELECT id, make, model, year, owner_id, registration_id, TRUE AS created
                FROM inserted
                UNION ALL
                SELECT id, make, model, year, owner_id, registration_id, FALSE AS created
                FROM vehicles WHERE registration_id = $5
                LIMIT 1
                "#,
            )
            .bind(&input.make)
            .bind(&input.model)
            .bind(input.year)
            .bind(input.owner_id)
            .bind(input.registration_id)
            .fetch_optional(self.pool)
            .await?;

            match row {
                Some(r) if r.created => return Ok(Created::New(r.vehicle.id)),
                Some(r) => return Ok(Created::Existing(r.vehicle)),
                None => continue,
            }
        }

        Err(DbError::InsertContended {
            table: "vehicles",
            attempts: INSERT_ATTEMPTS,
        })
    }

    /// Joined list (single query).
    pub async fn list(&self) -> Result<Vec<VehicleView>, DbError> {
        let sql = format!("{} ORDER BY v.id", VIEW_SELECT);
        let vehicles = sqlx::query_as(&sql).fetch_all(self.pool).await?;
        Ok(vehicles)
    }

    pub async fn get(&self, id: i64) -> Result<Option<VehicleView>, DbError> {
        let sql = format!("{} WHERE v.id = $1", VIEW_SELECT);
        let vehicle = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(vehicle)
    }

    pub async fn find_by_registration(
        &self,
        registration_id: i64,
    ) -> Result<Option<Vehicle>, DbError> {
        let vehicle = sqlx::query_as(
            r#"
            SELECT id, make, model, year, owner_id, registration_id
            FROM vehicles WHERE registration_id = $1
            "#,
        )
        .bind(registration_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(vehicle)
    }

    pub async fn update(
        &self,
        id: i64,
        input: &VehicleInput,
    ) -> Result<Updated<Vehicle>, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET make = $1, model = $2, year = $3, owner_id = $4, registration_id = $5
            WHERE id = $6
            "#,
        )
        .bind(&input.make)
        .bind(&input.model)
        .bind(input.year)
        .bind(input.owner_id)
        .bind(input.registration_id)
        .bind(id)
        .execute(self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Ok(Updated::Missing),
            Ok(_) => Ok(Updated::Applied),
            Err(e) if is_unique_violation(&e) => {
                match self.find_by_registration(input.registration_id).await? {
                    Some(existing) => Ok(Updated::Conflict(existing)),
                    None => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let done = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate;
    use crate::db::repos::{OwnerRepo, RegistrationRepo};
    use crate::models::{OwnerInput, RegistrationInput};

    #[tokio::test]
    #[ignore = "requires database"]
    async fn orphaned_vehicle_drops_out_of_list() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("connect failed");
        migrate(&pool).await.expect("migrate failed");

        let tag = std::process::id();
        let Created::New(owner_id) = OwnerRepo::new(&pool)
            .create(&OwnerInput {
                name: format!("orphan owner {}", tag),
            })
            .await
            .unwrap()
        else {
            panic!("owner should be new");
        };
        let Created::New(registration_id) = RegistrationRepo::new(&pool)
            .create(&RegistrationInput {
                plate_number: format!("ORPHAN{}", tag),
                state: "Goa".into(),
            })
            .await
            .unwrap()
        else {
            panic!("registration should be new");
        };

        let repo = VehicleRepo::new(&pool);
        let Created::New(vehicle_id) = repo
            .create(&VehicleInput {
                make: "TATA".into(),
                model: "Curve".into(),
                year: 2025,
                owner_id,
                registration_id,
            })
            .await
            .unwrap()
        else {
            panic!("vehicle should be new");
        };

        let view = repo.get(vehicle_id).await.unwrap().expect("joined row");
        assert_eq!(view.owner_name, format!("orphan owner {}", tag));

        assert!(OwnerRepo::new(&pool).delete(owner_id).await.unwrap());
        assert!(repo.get(vehicle_id).await.unwrap().is_none());
        assert!(repo.list().await.unwrap().iter().all(|v| v.id != vehicle_id));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_onto_used_registration_conflicts() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("connect failed");
        migrate(&pool).await.expect("migrate failed");

        let tag = std::process::id();
        let registrations = RegistrationRepo::new(&pool);
        let mut registration_ids = Vec::new();
        for plate in ["UPDA", "UPDB"] {
            let id = match registrations
                .create(&RegistrationInput {
                    plate_number: format!("{}{}", plate, tag),
                    state: "Goa".into(),
                })
                .await
                .unwrap()
            {
                Created::New(id) => id,
                Created::Existing(r) => r.id,
            };
            registration_ids.push(id);
        }

        let repo = VehicleRepo::new(&pool);
        let vehicle = |registration_id| VehicleInput {
            make: "TATA".into(),
            model: "Nexon".into(),
            year: 2024,
            owner_id: 1,
            registration_id,
        };
        let mut vehicle_ids = Vec::new();
        for &registration_id in &registration_ids {
            let id = match repo.create(&vehicle(registration_id)).await.unwrap() {
                Created::New(id) => id,
                Created::Existing(v) => v.id,
            };
            vehicle_ids.push(id);
        }

        match repo
            .update(vehicle_ids[0], &vehicle(registration_ids[1]))
            .await
            .unwrap()
        {
            Updated::Conflict(existing) => {
                assert_eq!(existing.id, vehicle_ids[1]);
                assert_eq!(existing.registration_id, registration_ids[1]);
            }
            other => panic!("expected conflict, got {:?}", other),
        }

        assert_eq!(
            repo.update(i64::MAX, &vehicle(registration_ids[0]))
                .await
                .unwrap(),
            Updated::Missing
        );
    }
}
