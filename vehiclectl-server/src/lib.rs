//! vehiclectl-server: HTTP API for owners, registrations, and vehicles
//!
//! Layers, leaf first:
//! - `db`: pooled PostgreSQL access behind the [`Store`] trait
//! - `models`: typed records and request validation
//! - `services`: create/list/get/update/delete orchestration per entity
//! - `http`: axum routes under `/api/v1`

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod services;

pub use config::{DatabaseConfig, ServerConfig};
pub use db::{create_pool, migrate, PgStore, Store};
pub use http::{build_router, run_server, ApiError, AppState};
