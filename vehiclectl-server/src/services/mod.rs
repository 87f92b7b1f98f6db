//! Entity services
//!
//! Each service borrows the injected [`Store`](crate::db::Store) and turns
//! storage outcomes into the API's vocabulary: an identity, a conflict
//! carrying the row that already holds the natural key, or not-found.
//! Database failures are logged here, once, with the operation name.

pub mod owners;
pub mod registrations;
pub mod vehicles;

use serde::Serialize;

use crate::db::DbError;
use crate::models::{Owner, Registration, Vehicle};

pub use owners::OwnerService;
pub use registrations::RegistrationService;
pub use vehicles::VehicleService;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Row that already holds a natural key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExistingRow {
    Owner(Owner),
    Registration(Registration),
    Vehicle(Vehicle),
}

impl ExistingRow {
    pub fn id(&self) -> i64 {
        match self {
            Self::Owner(o) => o.id,
            Self::Registration(r) => r.id,
            Self::Vehicle(v) => v.id,
        }
    }
}

impl From<Owner> for ExistingRow {
    fn from(o: Owner) -> Self {
        Self::Owner(o)
    }
}

impl From<Registration> for ExistingRow {
    fn from(r: Registration) -> Self {
        Self::Registration(r)
    }
}

impl From<Vehicle> for ExistingRow {
    fn from(v: Vehicle) -> Self {
        Self::Vehicle(v)
    }
}

/// Service-level failure
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{message}")]
    Conflict {
        message: &'static str,
        existing: ExistingRow,
    },

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("{operation} failed: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: DbError,
    },
}

impl ServiceError {
    pub(crate) fn conflict(message: &'static str, existing: impl Into<ExistingRow>) -> Self {
        Self::Conflict {
            message,
            existing: existing.into(),
        }
    }

    pub(crate) fn not_found(resource: &'static str, id: i64) -> Self {
        Self::NotFound { resource, id }
    }
}

/// Log a storage failure and wrap it for the caller.
pub(crate) fn db_failure(operation: &'static str) -> impl FnOnce(DbError) -> ServiceError {
    move |source| {
        tracing::error!(operation, error = %source, "Database error");
        ServiceError::Database { operation, source }
    }
}
