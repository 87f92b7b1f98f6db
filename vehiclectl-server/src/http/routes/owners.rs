//! Owner endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use super::MessageResponse;
use crate::http::error::ApiError;
use crate::http::extractors::{EntityId, ValidJson};
use crate::http::server::AppState;
use crate::models::{Owner, OwnerInput};
use crate::services::OwnerService;

/// Create owner response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerCreated {
    pub owner_id: i64,
}

/// POST /owners
async fn create_owner(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<OwnerInput>,
) -> Result<(StatusCode, Json<OwnerCreated>), ApiError> {
    let owner_id = OwnerService::new(state.store()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(OwnerCreated { owner_id })))
}

/// GET /owners
async fn list_owners(State(state): State<AppState>) -> Result<Json<Vec<Owner>>, ApiError> {
    let owners = OwnerService::new(state.store()).list().await?;
    Ok(Json(owners))
}

/// GET /owners/{id}
async fn get_owner(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<Owner>, ApiError> {
    let owner = OwnerService::new(state.store()).get(id).await?;
    Ok(Json(owner))
}

/// PUT /owners/{id}
async fn update_owner(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidJson(input): ValidJson<OwnerInput>,
) -> Result<Json<MessageResponse>, ApiError> {
    OwnerService::new(state.store()).update(id, &input).await?;
    Ok(Json(MessageResponse::UPDATED))
}

/// DELETE /owners/{id}
async fn delete_owner(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<MessageResponse>, ApiError> {
    OwnerService::new(state.store()).delete(id).await?;
    Ok(Json(MessageResponse::DELETED))
}

/// Owner routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/owners", get(list_owners).post(create_owner))
        .route(
            "/owners/{id}",
            get(get_owner).put(update_owner).delete(delete_owner),
        )
}
