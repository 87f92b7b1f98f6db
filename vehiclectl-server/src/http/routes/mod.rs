//! Route handlers organized by resource

pub mod health;
pub mod owners;
pub mod registrations;
pub mod vehicles;

use axum::Router;
use serde::Serialize;

use super::server::AppState;

/// Body of successful update and delete responses
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub const UPDATED: Self = Self { message: "Updated" };
    pub const DELETED: Self = Self { message: "Deleted" };
}

/// Resource routes, mounted under `/api/v1`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(vehicles::router())
        .merge(registrations::router())
        .merge(owners::router())
}
