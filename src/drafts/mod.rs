//! Draft persistence for in-progress editor content.
//!
//! Drafts are opaque strings stored under a caller-chosen key. The store is
//! injected into the application state as `Arc<dyn DraftStore>`:
//! - `MemoryDraftStore`: DashMap, lost on restart
//! - `RedisDraftStore`: `SET`/`GET`/`DEL` under `{prefix}:{key}` with a TTL

mod factory;
mod memory_backend;
mod redis_backend;

pub use factory::create_draft_store;
pub use memory_backend::MemoryDraftStore;
pub use redis_backend::RedisDraftStore;

use async_trait::async_trait;
use thiserror::Error;

/// Maximum length of a draft key
pub const MAX_DRAFT_KEY_LENGTH: usize = 128;

/// Error type for draft store operations
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Invalid draft key: {0}")]
    InvalidKey(String),

    #[error("Redis error: {0}")]
    Redis(#[from] crate::redis::PoolError),
}

/// Persistence interface for drafts
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Backend name for health reporting
    fn backend_name(&self) -> &'static str;

    /// Load a draft, `None` when absent or expired
    async fn load(&self, key: &str) -> Result<Option<String>, DraftError>;

    /// Store a draft, replacing any previous value
    async fn save(&self, key: &str, value: &str) -> Result<(), DraftError>;

    /// Remove a draft, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool, DraftError>;

    /// Drop expired drafts, returning how many were removed
    async fn cleanup_expired(&self) -> Result<usize, DraftError>;
}

/// Draft keys are 1-128 chars of ASCII letters, digits, `-`, `_`, `.` or `:`.
pub fn validate_draft_key(key: &str) -> Result<(), DraftError> {
    if key.is_empty() {
        return Err(DraftError::InvalidKey("key cannot be empty".to_string()));
    }
    if key.len() > MAX_DRAFT_KEY_LENGTH {
        return Err(DraftError::InvalidKey(format!(
            "key exceeds {} characters",
            MAX_DRAFT_KEY_LENGTH
        )));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
    {
        return Err(DraftError::InvalidKey(format!(
            "'{}' contains unsupported characters",
            key
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_draft_key() {
        assert!(validate_draft_key("template-1:body").is_ok());
        assert!(validate_draft_key("a.b_c").is_ok());
        assert!(validate_draft_key("").is_err());
        assert!(validate_draft_key("has space").is_err());
        assert!(validate_draft_key(&"k".repeat(129)).is_err());
        assert!(validate_draft_key(&"k".repeat(128)).is_ok());
    }
}
