//! Registration record and payload

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use super::validation::{Check, Fields, FromPayload, StringRule, ValidationError};

const MAX_PLATE_LEN: usize = 20;
const MIN_STATE_LEN: usize = 2;
const MAX_STATE_LEN: usize = 50;

/// Registration row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: i64,
    pub plate_number: String,
    pub state: String,
}

/// Validated body of `POST /registrations` and `PUT /registrations/{id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInput {
    pub plate_number: String,
    pub state: String,
}

impl FromPayload for RegistrationInput {
    /// # Rules
    /// - `plate_number`: ASCII alphanumeric, 1 to 20 characters
    /// - `state`: string, 2 to 50 characters
    fn from_payload(body: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::new(body)?;

        let plate_number = StringRule::new("plate_number")
            .alphanumeric()
            .min(1)
            .max(MAX_PLATE_LEN)
            .message(Check::Empty, "Plate number is required")
            .message(Check::Alphanumeric, "Plate must be alphanumeric")
            .message(Check::Required, "Plate number must be provided")
            .check(&fields)?;

        let state = StringRule::new("state")
            .min(MIN_STATE_LEN)
            .max(MAX_STATE_LEN)
            .message(Check::Empty, "State is required")
            .message(Check::Required, "State must be provided")
            .check(&fields)?;

        fields.deny_unknown(&["plate_number", "state"])?;
        Ok(Self {
            plate_number,
            state,
        })
    }
}
