//! Redis-backed draft store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::redis::RedisPool;

use super::{validate_draft_key, DraftError, DraftStore};

/// Stores each draft as a plain string at `{prefix}:{key}`.
pub struct RedisDraftStore {
    pool: Arc<RedisPool>,
    prefix: String,
    ttl_seconds: u64,
}

impl RedisDraftStore {
    pub fn new(pool: Arc<RedisPool>, prefix: String, ttl_seconds: u64) -> Self {
        Self {
            pool,
            prefix,
            ttl_seconds,
        }
    }

    fn draft_key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }
}

#[async_trait]
impl DraftStore for RedisDraftStore {
    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn load(&self, key: &str) -> Result<Option<String>, DraftError> {
        validate_draft_key(key)?;
        Ok(self.pool.get(&self.draft_key(key)).await?)
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), DraftError> {
        validate_draft_key(key)?;
        let redis_key = self.draft_key(key);
        self.pool.set(&redis_key, value, self.ttl_seconds).await?;

        tracing::debug!(key = %redis_key, bytes = value.len(), "Draft saved to Redis");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DraftError> {
        validate_draft_key(key)?;
        Ok(self.pool.del(&self.draft_key(key)).await?)
    }

    /// Redis expires keys itself via `SET EX`
    async fn cleanup_expired(&self) -> Result<usize, DraftError> {
        Ok(0)
    }
}
