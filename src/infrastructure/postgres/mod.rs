//! PostgreSQL persistence module.
//!
//! Provides connection pooling and schema setup for the PostgreSQL template store.

pub mod pool;
pub mod schema;

pub use pool::{PostgresPool, PostgresPoolError};
pub use schema::run_migrations;
