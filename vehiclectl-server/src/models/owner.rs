//! Owner record and payload

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use super::validation::{Check, Fields, FromPayload, StringRule, ValidationError};

/// Maximum length for owner names
pub const MAX_OWNER_NAME_LEN: usize = 100;

/// Owner row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Owner {
    pub id: i64,
    pub name: String,
}

/// Validated body of `POST /owners` and `PUT /owners/{id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerInput {
    pub name: String,
}

impl FromPayload for OwnerInput {
    /// # Rules
    /// - `name`: string, 1 to 100 characters
    /// - no other keys
    fn from_payload(body: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::new(body)?;

        let name = StringRule::new("name")
            .min(1)
            .max(MAX_OWNER_NAME_LEN)
            .message(Check::Empty, "Owner name is required")
            .message(Check::Min, "Owner name cannot be empty")
            .message(Check::Required, "Owner name must be provided")
            .check(&fields)?;

        fields.deny_unknown(&["name"])?;
        Ok(Self { name })
    }
}
