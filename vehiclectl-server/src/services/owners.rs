//! Owner use cases

use super::{db_failure, ServiceError, ServiceResult};
use crate::db::{Created, Store, Updated};
use crate::models::{Owner, OwnerInput};

pub const OWNER_EXISTS: &str = "Owner already exists";

/// Owner CRUD over an injected store
pub struct OwnerService<'a> {
    store: &'a dyn Store,
}

impl<'a> OwnerService<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Returns the new identity, or a conflict echoing the owner with that name.
    pub async fn create(&self, input: &OwnerInput) -> ServiceResult<i64> {
        match self
            .store
            .create_owner(input)
            .await
            .map_err(db_failure("create_owner"))?
        {
            Created::New(id) => {
                tracing::debug!(id, "Owner created");
                Ok(id)
            }
            Created::Existing(owner) => Err(ServiceError::conflict(OWNER_EXISTS, owner)),
        }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Owner>> {
        self.store
            .list_owners()
            .await
            .map_err(db_failure("list_owners"))
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Owner> {
        self.store
            .get_owner(id)
            .await
            .map_err(db_failure("get_owner"))?
            .ok_or_else(|| ServiceError::not_found("owner", id))
    }

    pub async fn update(&self, id: i64, input: &OwnerInput) -> ServiceResult<()> {
        match self
            .store
            .update_owner(id, input)
            .await
            .map_err(db_failure("update_owner"))?
        {
            Updated::Applied => Ok(()),
            Updated::Missing => Err(ServiceError::not_found("owner", id)),
            Updated::Conflict(other) => Err(ServiceError::conflict(OWNER_EXISTS, other)),
        }
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let removed = self
            .store
            .delete_owner(id)
            .await
            .map_err(db_failure("delete_owner"))?;
        if removed {
            Ok(())
        } else {
            Err(ServiceError::not_found("owner", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn input(name: &str) -> OwnerInput {
        OwnerInput { name: name.into() }
    }

    #[tokio::test]
    async fn second_create_with_same_name_conflicts() {
        let store = MemoryStore::new();
        let service = OwnerService::new(&store);

        assert_eq!(service.create(&input("Anish Pradhan")).await.unwrap(), 1);

        match service.create(&input("Anish Pradhan")).await {
            Err(ServiceError::Conflict { message, existing }) => {
                assert_eq!(message, OWNER_EXISTS);
                assert_eq!(existing.id(), 1);
            }
            other => panic!("expected conflict, got {:?}", other),
        }
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn round_trip_and_delete() {
        let store = MemoryStore::new();
        let service = OwnerService::new(&store);

        let id = service.create(&input("Mira")).await.unwrap();
        assert_eq!(service.get(id).await.unwrap().name, "Mira");

        service.update(id, &input("Mira K")).await.unwrap();
        assert_eq!(service.get(id).await.unwrap().name, "Mira K");

        service.delete(id).await.unwrap();
        assert!(matches!(
            service.get(id).await,
            Err(ServiceError::NotFound { resource: "owner", .. })
        ));
    }

    #[tokio::test]
    async fn update_and_delete_report_missing() {
        let store = MemoryStore::new();
        let service = OwnerService::new(&store);

        assert!(matches!(
            service.update(9, &input("Nobody")).await,
            Err(ServiceError::NotFound { id: 9, .. })
        ));
        assert!(matches!(
            service.delete(9).await,
            Err(ServiceError::NotFound { id: 9, .. })
        ));
    }

    #[tokio::test]
    async fn rename_onto_taken_name_conflicts() {
        let store = MemoryStore::new();
        let service = OwnerService::new(&store);
        let a = service.create(&input("A")).await.unwrap();
        let b = service.create(&input("B")).await.unwrap();

        match service.update(b, &input("A")).await {
            Err(ServiceError::Conflict { existing, .. }) => assert_eq!(existing.id(), a),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn storage_failure_surfaces_operation() {
        let store = MemoryStore::unavailable();
        let service = OwnerService::new(&store);

        match service.list().await {
            Err(ServiceError::Database { operation, .. }) => assert_eq!(operation, "list_owners"),
            other => panic!("expected database error, got {:?}", other),
        }
    }
}
