//! Vehicle use cases
//!
//! Reads return the joined [`VehicleView`]; writes take raw references and
//! do not check that the owner or registration exists.

use super::{db_failure, ServiceError, ServiceResult};
use crate::db::{Created, Store, Updated};
use crate::models::{VehicleInput, VehicleView};

pub const REGISTRATION_IN_USE: &str = "Vehicle with this registration already exists";

/// Vehicle CRUD over an injected store
pub struct VehicleService<'a> {
    store: &'a dyn Store,
}

impl<'a> VehicleService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: &VehicleInput) -> ServiceResult<i64> {
        match self
            .store
            .create_vehicle(input)
            .await
            .map_err(db_failure("create_vehicle"))?
        {
            Created::New(id) => {
                tracing::debug!(id, registration_id = input.registration_id, "Vehicle created");
                Ok(id)
            }
            Created::Existing(existing) => {
                Err(ServiceError::conflict(REGISTRATION_IN_USE, existing))
            }
        }
    }

    pub async fn list(&self) -> ServiceResult<Vec<VehicleView>> {
        self.store
            .list_vehicles()
            .await
            .map_err(db_failure("list_vehicles"))
    }

    /// Not found also covers a vehicle whose owner or registration is gone.
    pub async fn get(&self, id: i64) -> ServiceResult<VehicleView> {
        self.store
            .get_vehicle(id)
            .await
            .map_err(db_failure("get_vehicle"))?
            .ok_or_else(|| ServiceError::not_found("vehicle", id))
    }

    pub async fn update(&self, id: i64, input: &VehicleInput) -> ServiceResult<()> {
        match self
            .store
            .update_vehicle(id, input)
            .await
            .map_err(db_failure("update_vehicle"))?
        {
            Updated::Applied => Ok(()),
            Updated::Missing => Err(ServiceError::not_found("vehicle", id)),
            Updated::Conflict(other) => Err(ServiceError::conflict(REGISTRATION_IN_USE, other)),
        }
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let removed = self
            .store
            .delete_vehicle(id)
            .await
            .map_err(db_failure("delete_vehicle"))?;
        if removed {
            Ok(())
        } else {
            Err(ServiceError::not_found("vehicle", id))
        }
    }
}
