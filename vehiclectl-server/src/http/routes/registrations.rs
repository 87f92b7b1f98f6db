//! Registration endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use super::MessageResponse;
use crate::http::error::ApiError;
use crate::http::extractors::{EntityId, ValidJson};
use crate::http::server::AppState;
use crate::models::{Registration, RegistrationInput};
use crate::services::RegistrationService;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationCreated {
    pub registration_id: i64,
}

async fn create_registration(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<RegistrationInput>,
) -> Result<(StatusCode, Json<RegistrationCreated>), ApiError> {
    let registration_id = RegistrationService::new(state.store()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(RegistrationCreated { registration_id })))
}

async fn list_registrations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Registration>>, ApiError> {
    let registrations = RegistrationService::new(state.store()).list().await?;
    Ok(Json(registrations))
}

async fn get_registration(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<Registration>, ApiError> {
    let registration = RegistrationService::new(state.store()).get(id).await?;
    Ok(Json(registration))
}

async fn update_registration(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidJson(input): ValidJson<RegistrationInput>,
) -> Result<Json<MessageResponse>, ApiError> {
    RegistrationService::new(state.store()).update(id, &input).await?;
    Ok(Json(MessageResponse::UPDATED))
}

async fn delete_registration(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<MessageResponse>, ApiError> {
    RegistrationService::new(state.store()).delete(id).await?;
    Ok(Json(MessageResponse::DELETED))
}

/// Registration routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/registrations",
            get(list_registrations).post(create_registration),
        )
        .route(
            "/registrations/{id}",
            get(get_registration)
                .put(update_registration)
                .delete(delete_registration),
        )
}
