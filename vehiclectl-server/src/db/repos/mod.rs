//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Inserts go through ON CONFLICT on the natural key (no check-then-insert)
//! - Updates report a natural-key collision as a conflict, not an error
//! - Vehicle reads JOIN owners and registrations in one query (no N+1)

pub mod owners;
pub mod registrations;
pub mod vehicles;

pub use owners::OwnerRepo;
pub use registrations::RegistrationRepo;
pub use vehicles::VehicleRepo;

/// Attempts at the insert-or-fetch statement before giving up.
///
/// A conflicting row committed after the statement snapshot is invisible
/// to the fetch half; a second attempt sees it.
pub(crate) const INSERT_ATTEMPTS: usize = 3;

/// True when the error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
