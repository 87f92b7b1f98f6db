//! In-memory [`Store`] for tests
//!
//! Mirrors the PostgreSQL semantics: identities start at 1 and are never
//! reused, natural keys are unique (plates regardless of case), and
//! vehicle reads behave like inner joins.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Created, DbError, Store, Updated};
use crate::models::{
    Owner, OwnerInput, Registration, RegistrationInput, Vehicle, VehicleInput, VehicleView,
};

#[derive(Default)]
struct Tables {
    owners: BTreeMap<i64, Owner>,
    registrations: BTreeMap<i64, Registration>,
    vehicles: BTreeMap<i64, Vehicle>,
    next_owner: i64,
    next_registration: i64,
    next_vehicle: i64,
}

impl Tables {
    fn view(&self, vehicle: &Vehicle) -> Option<VehicleView> {
        let owner = self.owners.get(&vehicle.owner_id)?;
        let registration = self.registrations.get(&vehicle.registration_id)?;
        Some(VehicleView {
            id: vehicle.id,
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            owner_name: owner.name.clone(),
            plate_number: registration.plate_number.clone(),
            state: registration.state.clone(),
        })
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Test double for [`Store`]
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every call fails as if the pool were exhausted.
    pub fn unavailable() -> Self {
        let store = Self::default();
        store.set_unavailable(true);
        store
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), DbError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_owner(&self, input: &OwnerInput) -> Result<Created<Owner>, DbError> {
        self.check()?;
        let mut t = self.tables.write().await;
        if let Some(existing) = t.owners.values().find(|o| o.name == input.name) {
            return Ok(Created::Existing(existing.clone()));
        }
        let id = next_id(&mut t.next_owner);
        t.owners.insert(
            id,
            Owner {
                id,
                name: input.name.clone(),
            },
        );
        Ok(Created::New(id))
    }

    async fn list_owners(&self) -> Result<Vec<Owner>, DbError> {
        self.check()?;
        Ok(self.tables.read().await.owners.values().cloned().collect())
    }

    async fn get_owner(&self, id: i64) -> Result<Option<Owner>, DbError> {
        self.check()?;
        Ok(self.tables.read().await.owners.get(&id).cloned())
    }

    async fn update_owner(&self, id: i64, input: &OwnerInput) -> Result<Updated<Owner>, DbError> {
        self.check()?;
        let mut t = self.tables.write().await;
        if !t.owners.contains_key(&id) {
            return Ok(Updated::Missing);
        }
        if let Some(other) = t.owners.values().find(|o| o.id != id && o.name == input.name) {
            return Ok(Updated::Conflict(other.clone()));
        }
        if let Some(owner) = t.owners.get_mut(&id) {
            owner.name = input.name.clone();
        }
        Ok(Updated::Applied)
    }

    async fn delete_owner(&self, id: i64) -> Result<bool, DbError> {
        self.check()?;
        Ok(self.tables.write().await.owners.remove(&id).is_some())
    }

    async fn create_registration(
        &self,
        input: &RegistrationInput,
    ) -> Result<Created<Registration>, DbError> {
        self.check()?;
        let mut t = self.tables.write().await;
        if let Some(existing) = t
            .registrations
            .values()
            .find(|r| r.plate_number.eq_ignore_ascii_case(&input.plate_number))
        {
            return Ok(Created::Existing(existing.clone()));
        }
        let id = next_id(&mut t.next_registration);
        t.registrations.insert(
            id,
            Registration {
                id,
                plate_number: input.plate_number.clone(),
                state: input.state.clone(),
            },
        );
        Ok(Created::New(id))
    }

    async fn list_registrations(&self) -> Result<Vec<Registration>, DbError> {
        self.check()?;
        Ok(self.tables.read().await.registrations.values().cloned().collect())
    }

    async fn get_registration(&self, id: i64) -> Result<Option<Registration>, DbError> {
        self.check()?;
        Ok(self.tables.read().await.registrations.get(&id).cloned())
    }

    async fn update_registration(
        &self,
        id: i64,
        input: &RegistrationInput,
    ) -> Result<Updated<Registration>, DbError> {
        self.check()?;
        let mut t = self.tables.write().await;
        if !t.registrations.contains_key(&id) {
            return Ok(Updated::Missing);
        }
        if let Some(other) = t
            .registrations
            .values()
            .find(|r| {
                r.id != id && r.plate_number.eq_ignore_ascii_case(&input.plate_number)
            })
        {
            return Ok(Updated::Conflict(other.clone()));
        }
        if let Some(registration) = t.registrations.get_mut(&id) {
            registration.plate_number = input.plate_number.clone();
            registration.state = input.state.clone();
        }
        Ok(Updated::Applied)
    }

    async fn delete_registration(&self, id: i64) -> Result<bool, DbError> {
        self.check()?;
        Ok(self.tables.write().await.registrations.remove(&id).is_some())
    }

    async fn create_vehicle(&self, input: &VehicleInput) -> Result<Created<Vehicle>, DbError> {
        self.check()?;
        let mut t = self.tables.write().await;
        if let Some(existing) = t
            .vehicles
            .values()
            .find(|v| v.registration_id == input.registration_id)
        {
            return Ok(Created::Existing(existing.clone()));
        }
        let id = next_id(&mut t.next_vehicle);
        t.vehicles.insert(
            id,
            Vehicle {
                id,
                make: input.make.clone(),
                model: input.model.clone(),
                year: input.year,
                owner_id: input.owner_id,
                registration_id: input.registration_id,
            },
        );
        Ok(Created::New(id))
    }

    async fn list_vehicles(&self) -> Result<Vec<VehicleView>, DbError> {
        self.check()?;
        let t = self.tables.read().await;
        Ok(t.vehicles.values().filter_map(|v| t.view(v)).collect())
    }

    async fn get_vehicle(&self, id: i64) -> Result<Option<VehicleView>, DbError> {
        self.check()?;
        let t = self.tables.read().await;
        Ok(t.vehicles.get(&id).and_then(|v| t.view(v)))
    }

    async fn update_vehicle(
        &self,
        id: i64,
        input: &VehicleInput,
    ) -> Result<Updated<Vehicle>, DbError> {
        self.check()?;
        let mut t = self.tables.write().await;
        if !t.vehicles.contains_key(&id) {
            return Ok(Updated::Missing);
        }
        if let Some(other) = t
            .vehicles
            .values()
            .find(|v| v.id != id && v.registration_id == input.registration_id)
        {
            return Ok(Updated::Conflict(other.clone()));
        }
        if let Some(vehicle) = t.vehicles.get_mut(&id) {
            vehicle.make = input.make.clone();
            vehicle.model = input.model.clone();
            vehicle.year = input.year;
            vehicle.owner_id = input.owner_id;
            vehicle.registration_id = input.registration_id;
        }
        Ok(Updated::Applied)
    }

    async fn delete_vehicle(&self, id: i64) -> Result<bool, DbError> {
        self.check()?;
        Ok(self.tables.write().await.vehicles.remove(&id).is_some())
    }
}
