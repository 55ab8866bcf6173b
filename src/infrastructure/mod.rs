//! Infrastructure layer modules
//!
//! Shared components used by the template service:
//! - `config`: Application configuration and settings
//! - `error`: HTTP-facing error type
//! - `metrics`: Prometheus metrics helpers
//! - `postgres`: PostgreSQL connection pool and schema
//! - `redis`: Redis connection pool for drafts

pub mod config;
pub mod error;
pub mod metrics;
pub mod postgres;
pub mod redis;
