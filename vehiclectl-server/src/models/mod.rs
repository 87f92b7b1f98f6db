//! Domain records and validated request payloads
//!
//! Records are what the database returns; `*Input` types are what a
//! request body becomes once it passes validation.

pub mod owner;
pub mod registration;
pub mod validation;
pub mod vehicle;

pub use owner::{Owner, OwnerInput};
pub use registration::{Registration, RegistrationInput};
pub use validation::{FromPayload, ValidationError};
pub use vehicle::{Vehicle, VehicleInput, VehicleView};
