//! [`Store`] backed by PostgreSQL

use async_trait::async_trait;
use sqlx::PgPool;

use super::repos::{OwnerRepo, RegistrationRepo, VehicleRepo};
use super::{Created, DbError, Store, Updated};
use crate::models::{
    Owner, OwnerInput, Registration, RegistrationInput, Vehicle, VehicleInput, VehicleView,
};

/// Pool-backed store; cloning shares the pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_owner(&self, input: &OwnerInput) -> Result<Created<Owner>, DbError> {
        OwnerRepo::new(&self.pool).create(input).await
    }

    async fn list_owners(&self) -> Result<Vec<Owner>, DbError> {
        OwnerRepo::new(&self.pool).list().await
    }

    async fn get_owner(&self, id: i64) -> Result<Option<Owner>, DbError> {
        OwnerRepo::new(&self.pool).get(id).await
    }

    async fn update_owner(&self, id: i64, input: &OwnerInput) -> Result<Updated<Owner>, DbError> {
        OwnerRepo::new(&self.pool).update(id, input).await
    }

    async fn delete_owner(&self, id: i64) -> Result<bool, DbError> {
        OwnerRepo::new(&self.pool).delete(id).await
    }

    async fn create_registration(
        &self,
        input: &RegistrationInput,
    ) -> Result<Created<Registration>, DbError> {
        RegistrationRepo::new(&self.pool).create(input).await
    }

    async fn list_registrations(&self) -> Result<Vec<Registration>, DbError> {
        RegistrationRepo::new(&self.pool).list().await
    }

    async fn get_registration(&self, id: i64) -> Result<Option<Registration>, DbError> {
        RegistrationRepo::new(&self.pool).get(id).await
    }

    async fn update_registration(
        &self,
        id: i64,
        input: &RegistrationInput,
    ) -> Result<Updated<Registration>, DbError> {
        RegistrationRepo::new(&self.pool).update(id, input).await
    }

    async fn delete_registration(&self, id: i64) -> Result<bool, DbError> {
        RegistrationRepo::new(&self.pool).delete(id).await
    }

    async fn create_vehicle(&self, input: &VehicleInput) -> Result<Created<Vehicle>, DbError> {
        VehicleRepo::new(&self.pool).create(input).await
    }

    async fn list_vehicles(&self) -> Result<Vec<VehicleView>, DbError> {
        VehicleRepo::new(&self.pool).list().await
    }

    async fn get_vehicle(&self, id: i64) -> Result<Option<VehicleView>, DbError> {
        VehicleRepo::new(&self.pool).get(id).await
    }

    async fn update_vehicle(
        &self,
        id: i64,
        input: &VehicleInput,
    ) -> Result<Updated<Vehicle>, DbError> {
        VehicleRepo::new(&self.pool).update(id, input).await
    }

    async fn delete_vehicle(&self, id: i64) -> Result<bool, DbError> {
        VehicleRepo::new(&self.pool).delete(id).await
    }
}
