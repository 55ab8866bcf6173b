//! Draft store factory

use std::sync::Arc;

use crate::config::DraftConfig;
use crate::redis::RedisPool;

use super::{DraftStore, MemoryDraftStore, RedisDraftStore};

/// Create a draft store based on configuration.
///
/// - `"redis"`: a `RedisDraftStore` when Redis answers a PING at startup,
///   otherwise falls back to memory
/// - `"memory"` (default): a `MemoryDraftStore`
pub async fn create_draft_store(config: &DraftConfig) -> Arc<dyn DraftStore> {
    match config.backend.as_str() {
        "redis" => match connect_redis(&config.redis_url).await {
            Ok(pool) => {
                tracing::info!(
                    backend = "redis",
                    prefix = %config.prefix,
                    ttl_seconds = config.ttl_seconds,
                    "Creating Redis draft store"
                );
                Arc::new(RedisDraftStore::new(
                    pool,
                    config.prefix.clone(),
                    config.ttl_seconds,
                ))
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Redis draft store unavailable, falling back to memory"
                );
                Arc::new(MemoryDraftStore::with_ttl(config.ttl_seconds))
            }
        },
        "memory" => {
            tracing::info!(backend = "memory", "Creating in-memory draft store");
            Arc::new(MemoryDraftStore::with_ttl(config.ttl_seconds))
        }
        other => {
            tracing::warn!(
                backend = %other,
                "Unknown draft backend, using memory"
            );
            Arc::new(MemoryDraftStore::with_ttl(config.ttl_seconds))
        }
    }
}

async fn connect_redis(url: &str) -> Result<Arc<RedisPool>, crate::redis::PoolError> {
    let pool = RedisPool::new(url)?;
    pool.ping().await?;
    Ok(Arc::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_selected() {
        let store = create_draft_store(&DraftConfig::default()).await;
        assert_eq!(store.backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_unreachable_redis_falls_back_to_memory() {
        let config = DraftConfig {
            backend: "redis".to_string(),
            redis_url: "redis://127.0.0.1:1".to_string(),
            ..DraftConfig::default()
        };
        let store = create_draft_store(&config).await;
        assert_eq!(store.backend_name(), "memory");
    }
}
