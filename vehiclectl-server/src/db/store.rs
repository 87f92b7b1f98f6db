//! Storage contract shared by the PostgreSQL and in-memory backends

use async_trait::async_trait;

use crate::models::{
    Owner, OwnerInput, Registration, RegistrationInput, Vehicle, VehicleInput, VehicleView,
};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// Insert-or-fetch found neither a new nor an existing row on every attempt
    #[error("insert into {table} lost to concurrent writers {attempts} times")]
    InsertContended {
        table: &'static str,
        attempts: usize,
    },
}

/// Result of an insert guarded by a natural key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created<T> {
    /// Row inserted with this identity
    New(i64),
    /// Natural key already taken by this row; nothing inserted
    Existing(T),
}

/// Result of an update-by-identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Updated<T> {
    Applied,
    /// No row has the identity
    Missing,
    /// New values collide with this other row's natural key
    Conflict(T),
}

/// Persistence operations for all three entities.
///
/// Implementations must make the natural-key check and the insert a single
/// atomic step.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_owner(&self, input: &OwnerInput) -> Result<Created<Owner>, DbError>;
    async fn list_owners(&self) -> Result<Vec<Owner>, DbError>;
    async fn get_owner(&self, id: i64) -> Result<Option<Owner>, DbError>;
    async fn update_owner(&self, id: i64, input: &OwnerInput) -> Result<Updated<Owner>, DbError>;
    async fn delete_owner(&self, id: i64) -> Result<bool, DbError>;

    async fn create_registration(
        &self,
        input: &RegistrationInput,
    ) -> Result<Created<Registration>, DbError>;
    async fn list_registrations(&self) -> Result<Vec<Registration>, DbError>;
    async fn get_registration(&self, id: i64) -> Result<Option<Registration>, DbError>;
    async fn update_registration(
        &self,
        id: i64,
        input: &RegistrationInput,
    ) -> Result<Updated<Registration>, DbError>;
    async fn delete_registration(&self, id: i64) -> Result<bool, DbError>;

    async fn create_vehicle(&self, input: &VehicleInput) -> Result<Created<Vehicle>, DbError>;
    /// Vehicles whose owner and registration both exist, joined.
    async fn list_vehicles(&self) -> Result<Vec<VehicleView>, DbError>;
    async fn get_vehicle(&self, id: i64) -> Result<Option<VehicleView>, DbError>;
    async fn update_vehicle(
        &self,
        id: i64,
        input: &VehicleInput,
    ) -> Result<Updated<Vehicle>, DbError>;
    async fn delete_vehicle(&self, id: i64) -> Result<bool, DbError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contended_insert_names_the_table() {
        let err = DbError::InsertContended {
            table: "owners",
            attempts: 3,
        };
        assert_eq!(
            err.to_string(),
            "insert into owners lost to concurrent writers 3 times"
        );
    }
}
