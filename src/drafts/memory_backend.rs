//! In-memory draft store.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::metrics::DraftMetrics;

use super::{validate_draft_key, DraftError, DraftStore};

struct DraftEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl DraftEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// DashMap-backed draft store.
///
/// Expired entries are dropped on access and by `cleanup_expired` sweeps.
pub struct MemoryDraftStore {
    drafts: DashMap<String, DraftEntry>,
    ttl: Option<Duration>,
}

impl MemoryDraftStore {
    /// Store without expiry
    pub fn new() -> Self {
        Self {
            drafts: DashMap::new(),
            ttl: None,
        }
    }

    /// Store whose entries expire `ttl_seconds` after their last write (0 disables expiry)
    pub fn with_ttl(ttl_seconds: u64) -> Self {
        Self {
            drafts: DashMap::new(),
            ttl: (ttl_seconds > 0).then(|| Duration::from_secs(ttl_seconds)),
        }
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

impl Default for MemoryDraftStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self, key: &str) -> Result<Option<String>, DraftError> {
        validate_draft_key(key)?;
        let now = Instant::now();

        let value = match self.drafts.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.value.clone()),
            Some(_) => None,
            None => return Ok(None),
        };

        if value.is_none() {
            self.drafts.remove_if(key, |_, entry| entry.is_expired(now));
        }
        Ok(value)
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), DraftError> {
        validate_draft_key(key)?;
        let entry = DraftEntry {
            value: value.to_string(),
            expires_at: self.ttl.map(|ttl| Instant::now() + ttl),
        };
        self.drafts.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DraftError> {
        validate_draft_key(key)?;
        let now = Instant::now();
        Ok(self
            .drafts
            .remove(key)
            .is_some_and(|(_, entry)| !entry.is_expired(now)))
    }

    async fn cleanup_expired(&self) -> Result<usize, DraftError> {
        if self.ttl.is_none() {
            return Ok(0);
        }

        let now = Instant::now();
        let before = self.drafts.len();
        self.drafts.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.drafts.len());

        if removed > 0 {
            DraftMetrics::record_expired(removed);
            tracing::debug!(removed, "Expired drafts removed");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_load_delete() {
        let store = MemoryDraftStore::new();
        assert_eq!(store.load("welcome").await.unwrap(), None);

        store.save("welcome", "<p>Hi</p>").await.unwrap();
        assert_eq!(
            store.load("welcome").await.unwrap().as_deref(),
            Some("<p>Hi</p>")
        );

        store.save("welcome", "<p>Hello</p>").await.unwrap();
        assert_eq!(
            store.load("welcome").await.unwrap().as_deref(),
            Some("<p>Hello</p>")
        );

        assert!(store.delete("welcome").await.unwrap());
        assert!(!store.delete("welcome").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_key_rejected() {
        let store = MemoryDraftStore::new();
        assert!(matches!(
            store.save("bad key", "x").await,
            Err(DraftError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_entry_is_dropped() {
        let store = MemoryDraftStore::new();
        store.drafts.insert(
            "old".to_string(),
            DraftEntry {
                value: "stale".to_string(),
                expires_at: Some(Instant::now() - Duration::from_secs(1)),
            },
        );

        assert_eq!(store.load("old").await.unwrap(), None);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_reclaims_unread_expired_drafts() {
        let store = MemoryDraftStore::with_ttl(3600);
        store.save("fresh", "<p>new</p>").await.unwrap();
        store.drafts.insert(
            "abandoned".to_string(),
            DraftEntry {
                value: "stale".to_string(),
                expires_at: Some(Instant::now() - Duration::from_secs(1)),
            },
        );
        assert_eq!(store.len(), 2);

        assert_eq!(store.cleanup_expired().await.unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.load("fresh").await.unwrap().as_deref(),
            Some("<p>new</p>")
        );
        assert_eq!(store.cleanup_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_without_ttl_keeps_everything() {
        let store = MemoryDraftStore::new();
        store.save("a", "1").await.unwrap();
        assert_eq!(store.cleanup_expired().await.unwrap(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_zero_ttl_disables_expiry() {
        assert!(MemoryDraftStore::with_ttl(0).ttl.is_none());
        assert_eq!(
            MemoryDraftStore::with_ttl(30).ttl,
            Some(Duration::from_secs(30))
        );
    }
}
