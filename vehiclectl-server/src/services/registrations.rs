//! Registration use cases

use super::{db_failure, ServiceError, ServiceResult};
use crate::db::{Created, Store, Updated};
use crate::models::{Registration, RegistrationInput};

pub const PLATE_REGISTERED: &str = "Plate number is already registered";

/// Registration CRUD over an injected store
pub struct RegistrationService<'a> {
    store: &'a dyn Store,
}

impl<'a> RegistrationService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: &RegistrationInput) -> ServiceResult<i64> {
        match self
            .store
            .create_registration(input)
            .await
            .map_err(db_failure("create_registration"))?
        {
            Created::New(id) => {
                tracing::debug!(id, plate = %input.plate_number, "Registration created");
                Ok(id)
            }
            Created::Existing(existing) => Err(ServiceError::conflict(PLATE_REGISTERED, existing)),
        }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Registration>> {
        self.store
            .list_registrations()
            .await
            .map_err(db_failure("list_registrations"))
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Registration> {
        self.store
            .get_registration(id)
            .await
            .map_err(db_failure("get_registration"))?
            .ok_or_else(|| ServiceError::not_found("registration", id))
    }

    pub async fn update(&self, id: i64, input: &RegistrationInput) -> ServiceResult<()> {
        match self
            .store
            .update_registration(id, input)
            .await
            .map_err(db_failure("update_registration"))?
        {
            Updated::Applied => Ok(()),
            Updated::Missing => Err(ServiceError::not_found("registration", id)),
            Updated::Conflict(other) => Err(ServiceError::conflict(PLATE_REGISTERED, other)),
        }
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let removed = self
            .store
            .delete_registration(id)
            .await
            .map_err(db_failure("delete_registration"))?;
        if removed {
            Ok(())
        } else {
            Err(ServiceError::not_found("registration", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn input(plate: &str, state: &str) -> RegistrationInput {
        RegistrationInput {
            plate_number: plate.into(),
            state: state.into(),
        }
    }

    #[tokio::test]
    async fn duplicate_plate_conflicts() {
        let store = MemoryStore::new();
        let service = RegistrationService::new(&store);

        let id = service.create(&input("JMU132666", "Jammu")).await.unwrap();
        match service.create(&input("JMU132666", "Punjab")).await {
            Err(ServiceError::Conflict { message, existing }) => {
                assert_eq!(message, PLATE_REGISTERED);
                assert_eq!(existing.id(), id);
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn round_trip() {
        let store = MemoryStore::new();
        let service = RegistrationService::new(&store);

        let id = service.create(&input("KA01AB1234", "Karnataka")).await.unwrap();
        let got = service.get(id).await.unwrap();
        assert_eq!(got.plate_number, "KA01AB1234");
        assert_eq!(got.state, "Karnataka");

        service.update(id, &input("KA01AB1234", "Kerala")).await.unwrap();
        assert_eq!(service.get(id).await.unwrap().state, "Kerala");

        service.delete(id).await.unwrap();
        assert!(matches!(service.get(id).await, Err(ServiceError::NotFound { .. })));
    }
}
