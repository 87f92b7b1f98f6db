//! Vehicle endpoints
//!
//! Reads return the joined view (owner name, plate, state) rather than the
//! raw foreign keys; writes take the keys.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use super::MessageResponse;
use crate::http::error::ApiError;
use crate::http::extractors::{EntityId, ValidJson};
use crate::http::server::AppState;
use crate::models::{VehicleInput, VehicleView};
use crate::services::VehicleService;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCreated {
    pub vehicle_id: i64,
}

async fn create_vehicle(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<VehicleInput>,
) -> Result<(StatusCode, Json<VehicleCreated>), ApiError> {
    let vehicle_id = VehicleService::new(state.store()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(VehicleCreated { vehicle_id })))
}

async fn list_vehicles(State(state): State<AppState>) -> Result<Json<Vec<VehicleView>>, ApiError> {
    let vehicles = VehicleService::new(state.store()).list().await?;
    Ok(Json(vehicles))
}

async fn get_vehicle(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<VehicleView>, ApiError> {
    let vehicle = VehicleService::new(state.store()).get(id).await?;
    Ok(Json(vehicle))
}

async fn update_vehicle(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidJson(input): ValidJson<VehicleInput>,
) -> Result<Json<MessageResponse>, ApiError> {
    VehicleService::new(state.store()).update(id, &input).await?;
    Ok(Json(MessageResponse::UPDATED))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<MessageResponse>, ApiError> {
    VehicleService::new(state.store()).delete(id).await?;
    Ok(Json(MessageResponse::DELETED))
}

/// Vehicle routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route(
            "/vehicles/{id}",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
}
