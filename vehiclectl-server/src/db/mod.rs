//! Database layer - connection pool, schema bootstrap, and repositories
//!
//! # Design Principles
//!
//! - One bounded `PgPool` for the process, handed to [`PgStore`] at startup
//! - Natural keys are UNIQUE in the schema; inserts use ON CONFLICT, never
//!   check-then-insert
//! - Services only see the [`Store`] trait, so tests can swap in memory

pub mod migrations;
pub mod pool;
pub mod postgres;
pub mod repos;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use migrations::migrate;
pub use pool::{connect_options, create_pool};
pub use postgres::PgStore;
pub use store::{Created, DbError, Store, Updated};

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryStore;
