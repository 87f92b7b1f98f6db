//! Vehicle record, joined view, and payload

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use super::validation::{Fields, FromPayload, IntegerRule, StringRule, ValidationError};

/// Year of the first production automobile; nothing older is accepted.
pub const MIN_VEHICLE_YEAR: i64 = 1886;

/// Vehicle row as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub owner_id: i64,
    pub registration_id: i64,
}

/// Vehicle joined with its owner and registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct VehicleView {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(rename = "ownerName")]
    pub owner_name: String,
    pub plate_number: String,
    pub state: String,
}

/// Validated body of `POST /vehicles` and `PUT /vehicles/{id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleInput {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub owner_id: i64,
    pub registration_id: i64,
}

impl FromPayload for VehicleInput {
    fn from_payload(body: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::new(body)?;

        let make = StringRule::new("make").check(&fields)?;
        let model = StringRule::new("model").check(&fields)?;
        let year = IntegerRule::new("year")
            .min(MIN_VEHICLE_YEAR)
            .check_i32(&fields)?;
        let owner_id = IntegerRule::new("owner_id").check(&fields)?;
        let registration_id = IntegerRule::new("registration_id").check(&fields)?;

        fields.deny_unknown(&["make", "model", "year", "owner_id", "registration_id"])?;
        Ok(Self {
            make,
            model,
            year,
            owner_id,
            registration_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(year: Value) -> Value {
        json!({
            "make": "TATA",
            "model": "Curve",
            "year": year,
            "owner_id": 2,
            "registration_id": 4
        })
    }

    #[test]
    fn accepts_valid_vehicle() {
        let input = VehicleInput::from_payload(&body(json!(2025))).unwrap();
        assert_eq!(input.make, "TATA");
        assert_eq!(input.year, 2025);
        assert_eq!(input.registration_id, 4);
    }

    #[test]
    fn year_lower_bound() {
        assert!(VehicleInput::from_payload(&body(json!(1886))).is_ok());

        let err = VehicleInput::from_payload(&body(json!(1885))).unwrap_err();
        assert_eq!(err.to_string(), "\"year\" must be greater than or equal to 1886");
    }

    #[test]
    fn rejects_empty_make() {
        let mut b = body(json!(2020));
        b["make"] = json!("");
        let err = VehicleInput::from_payload(&b).unwrap_err();
        assert_eq!(err.to_string(), "\"make\" is not allowed to be empty");
    }

    #[test]
    fn rejects_string_owner_id() {
        let mut b = body(json!(2020));
        b["owner_id"] = json!("two");
        let err = VehicleInput::from_payload(&b).unwrap_err();
        assert!(matches!(err, ValidationError::NotNumber { field: "owner_id" }));
    }

    #[test]
    fn reports_first_missing_field() {
        let err = VehicleInput::from_payload(&json!({ "make": "TATA" })).unwrap_err();
        assert_eq!(err.to_string(), "\"model\" is required");
    }

    #[test]
    fn view_serializes_owner_name_in_camel_case() {
        let view = VehicleView {
            id: 1,
            make: "TATA".into(),
            model: "Curve".into(),
            year: 2025,
            owner_name: "Anish Pradhan".into(),
            plate_number: "JMU132666".into(),
            state: "Jammu".into(),
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["ownerName"], "Anish Pradhan");
        assert!(value.get("owner_name").is_none());
    }
}
