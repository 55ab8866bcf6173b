//! Redis connectivity for the draft store.

pub mod pool;

pub use pool::{PoolError, RedisPool};
