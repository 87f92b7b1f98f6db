//! API error types with IntoResponse
//!
//! Every failure leaves as one JSON body of the shape
//! `{ "error": ..., "details"?: ..., "existing"?: ... }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::models::ValidationError;
use crate::services::{ExistingRow, ServiceError};

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: i64 },

    /// Natural key already taken (403)
    Conflict {
        message: &'static str,
        existing: ExistingRow,
    },

    /// Database error (500, already logged by the service)
    Database { details: String },
}

/// Uniform error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing: Option<ExistingRow>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            existing: None,
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::FORBIDDEN,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(e) => ErrorBody::new(e.to_string()),
            Self::NotFound { resource, id } => ErrorBody {
                details: Some(format!("{} {} not found", resource, id)),
                ..ErrorBody::new("Not found")
            },
            Self::Conflict { message, existing } => ErrorBody {
                existing: Some(existing),
                ..ErrorBody::new(message)
            },
            Self::Database { details } => ErrorBody {
                details: Some(details),
                ..ErrorBody::new("DB error")
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Conflict { message, existing } => Self::Conflict { message, existing },
            ServiceError::NotFound { resource, id } => Self::NotFound { resource, id },
            ServiceError::Database { source, .. } => Self::Database {
                details: source.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Owner;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let (status, body) =
            body_of(ApiError::Validation(ValidationError::Empty { field: "make" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "\"make\" is not allowed to be empty");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let (status, body) = body_of(ApiError::NotFound {
            resource: "owner",
            id: 7,
        })
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
        assert_eq!(body["details"], "owner 7 not found");
    }

    #[tokio::test]
    async fn conflict_is_403_with_existing_row() {
        let (status, body) = body_of(ApiError::Conflict {
            message: "Owner already exists",
            existing: ExistingRow::Owner(Owner {
                id: 1,
                name: "Anish Pradhan".into(),
            }),
        })
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Owner already exists");
        assert_eq!(body["existing"]["id"], 1);
    }

    #[tokio::test]
    async fn database_error_is_500_with_details() {
        let err = ApiError::from(ServiceError::Database {
            operation: "list_owners",
            source: sqlx::Error::PoolTimedOut.into(),
        });
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "DB error");
        assert!(body["details"].as_str().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn contended_insert_is_500_naming_the_table() {
        let err = ApiError::from(ServiceError::Database {
            operation: "create_registration",
            source: crate::db::DbError::InsertContended {
                table: "registrations",
                attempts: 3,
            },
        });
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["details"],
            "insert into registrations lost to concurrent writers 3 times"
        );
    }
}
