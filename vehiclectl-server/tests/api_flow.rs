//! End-to-end request flow through the public router over the in-memory store
//!
//! Run with `cargo test -p vehiclectl-server --features test-utils`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use vehiclectl_server::db::MemoryStore;
use vehiclectl_server::{build_router, AppState};

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn register_a_vehicle_end_to_end() {
    let app = build_router(AppState::new(Arc::new(MemoryStore::new())));

    let (status, owner) = call(
        &app,
        Method::POST,
        "/api/v1/owners",
        Some(json!({ "name": "Anish Pradhan" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let owner_id = owner["ownerId"].as_i64().unwrap();

    let (status, registration) = call(
        &app,
        Method::POST,
        "/api/v1/registrations",
        Some(json!({ "plate_number": "BA1PA1234", "state": "Bagmati" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let registration_id = registration["registrationId"].as_i64().unwrap();

    let (status, vehicle) = call(
        &app,
        Method::POST,
        "/api/v1/vehicles",
        Some(json!({
            "make": "Toyota",
            "model": "Corolla",
            "year": 2020,
            "owner_id": owner_id,
            "registration_id": registration_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let vehicle_id = vehicle["vehicleId"].as_i64().unwrap();

    // Renaming the owner shows through the joined view.
    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/api/v1/owners/{}", owner_id),
        Some(json!({ "name": "Anish P." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, view) = call(
        &app,
        Method::GET,
        &format!("/api/v1/vehicles/{}", vehicle_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["ownerName"], "Anish P.");
    assert_eq!(view["plate_number"], "BA1PA1234");

    let (status, _) = call(
        &app,
        Method::DELETE,
        &format!("/api/v1/vehicles/{}", vehicle_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The registration is free again.
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/vehicles",
        Some(json!({
            "make": "Honda",
            "model": "Civic",
            "year": 2018,
            "owner_id": owner_id,
            "registration_id": registration_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn outage_and_recovery() {
    let store = Arc::new(MemoryStore::new());
    let app = build_router(AppState::new(store.clone()));

    store.set_unavailable(true);
    let (status, body) = call(&app, Method::GET, "/api/v1/owners", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "DB error");

    store.set_unavailable(false);
    let (status, body) = call(&app, Method::GET, "/api/v1/owners", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
