//! Time-boxed durable cache for the feed payload.
//!
//! A single entry lives in two named slots of the local store: the serialized
//! payload and its store time in epoch milliseconds. Staleness is computed on
//! read; there is no invalidation call. Anything unreadable in the slots is a
//! plain miss.

use anyhow::Result;
use chrono::Utc;
use thiserror::Error;

use super::types::FeedPayload;
use crate::storage::Database;

/// Slot holding the serialized payload.
pub const CACHE_KEY: &str = "friend-circle-lite-cache";
/// Slot holding the store time (epoch milliseconds, decimal text).
pub const CACHE_TIME_KEY: &str = "friend-circle-lite-cache-time";
/// Maximum age of a usable entry (30 minutes).
pub const CACHE_TTL_MILLIS: i64 = 30 * 60 * 1000;

/// Reasons a stored entry could not be used. Never leaves this module.
#[derive(Debug, Error)]
enum CacheError {
    #[error("storage read failed: {0}")]
    Storage(String),
    #[error("store time is not an integer: {0:?}")]
    BadTimestamp(String),
    #[error("store time present but payload slot is empty")]
    MissingPayload,
    #[error("payload is not valid JSON: {0}")]
    BadPayload(#[from] serde_json::Error),
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Returns true when an entry stored at `stored_at` is still usable at `now`.
pub fn is_fresh(stored_at: i64, now: i64) -> bool {
    now.saturating_sub(stored_at) < CACHE_TTL_MILLIS
}

/// Handle to the cache slot. Cheap to clone.
#[derive(Clone)]
pub struct FeedCache {
    db: Database,
}

impl FeedCache {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Return the cached payload if an entry exists and is younger than the TTL.
    pub async fn read(&self) -> Option<FeedPayload> {
        self.read_at(now_millis()).await
    }

    /// [`FeedCache::read`] against an explicit clock.
    pub async fn read_at(&self, now: i64) -> Option<FeedPayload> {
        match self.load_fresh(now).await {
            Ok(Some(payload)) => {
                tracing::debug!(articles = payload.article_data.len(), "Feed cache hit");
                Some(payload)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable feed cache entry");
                None
            }
        }
    }

    async fn load_fresh(&self, now: i64) -> Result<Option<FeedPayload>, CacheError> {
        let Some(stored_at) = self.slot(CACHE_TIME_KEY).await? else {
            tracing::debug!("Feed cache miss (empty)");
            return Ok(None);
        };
        let stored_at: i64 = stored_at
            .trim()
            .parse()
            .map_err(|_| CacheError::BadTimestamp(stored_at.clone()))?;

        if !is_fresh(stored_at, now) {
            tracing::debug!(
                age_ms = now.saturating_sub(stored_at),
                "Feed cache miss (expired)"
            );
            return Ok(None);
        }

        let raw = self
            .slot(CACHE_KEY)
            .await?
            .ok_or(CacheError::MissingPayload)?;
        let payload = FeedPayload::from_json(raw.as_bytes())?;
        Ok(Some(payload))
    }

    async fn slot(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.db
            .get_slot(key)
            .await
            .map_err(|e| CacheError::Storage(e.to_string()))
    }

    /// Store `payload` stamped with the current time, replacing any prior entry.
    pub async fn write(&self, payload: &FeedPayload) -> Result<()> {
        self.write_at(payload, now_millis()).await
    }

    /// [`FeedCache::write`] against an explicit clock.
    ///
    /// Both slots are written in one transaction so a reader never pairs a
    /// new timestamp with an old payload.
    pub async fn write_at(&self, payload: &FeedPayload, now: i64) -> Result<()> {
        let json = serde_json::to_string(payload)?;
        let stamp = now.to_string();
        self.db
            .set_slots(&[(CACHE_KEY, json.as_str()), (CACHE_TIME_KEY, stamp.as_str())])
            .await?;
        tracing::debug!(
            articles = payload.article_data.len(),
            bytes = json.len(),
            "Feed cache written"
        );
        Ok(())
    }

    /// Remove the entry entirely. Returns true if anything was stored.
    pub async fn clear(&self) -> Result<bool> {
        let removed = self.db.delete_slots(&[CACHE_KEY, CACHE_TIME_KEY]).await?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::types::{Article, FeedStatistics};

    const MINUTE: i64 = 60 * 1000;

    async fn test_cache() -> (Database, FeedCache) {
        let db = Database::open(":memory:").await.unwrap();
        let cache = FeedCache::new(db.clone());
        (db, cache)
    }

    fn sample_payload() -> FeedPayload {
        FeedPayload {
            article_data: vec![Article {
                title: "Post".to_string(),
                link: "https://alice.example.com/post".to_string(),
                author: "Alice".to_string(),
                avatar: None,
                created: "2026-10-16T10:00:00".to_string(),
            }],
            statistical_data: FeedStatistics {
                friends_num: 1,
                active_num: 1,
                article_num: 1,
                last_updated_time: "2026-10-16 10:30:00".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_empty_cache_is_miss() {
        let (_db, cache) = test_cache().await;
        assert!(cache.read_at(1_000).await.is_none());
    }

    #[tokio::test]
    async fn test_fresh_entry_hits_at_29_minutes() {
        let (_db, cache) = test_cache().await;
        let t = 1_700_000_000_000;
        cache.write_at(&sample_payload(), t).await.unwrap();

        let hit = cache.read_at(t + 29 * MINUTE).await;
        assert_eq!(hit, Some(sample_payload()));
    }

    #[tokio::test]
    async fn test_stale_entry_misses_at_31_minutes() {
        let (_db, cache) = test_cache().await;
        let t = 1_700_000_000_000;
        cache.write_at(&sample_payload(), t).await.unwrap();

        assert!(cache.read_at(t + 31 * MINUTE).await.is_none());
    }

    #[tokio::test]
    async fn test_exactly_ttl_is_stale() {
        let (_db, cache) = test_cache().await;
        let t = 1_700_000_000_000;
        cache.write_at(&sample_payload(), t).await.unwrap();

        assert!(cache.read_at(t + CACHE_TTL_MILLIS).await.is_none());
        assert!(cache.read_at(t + CACHE_TTL_MILLIS - 1).await.is_some());
    }

    #[tokio::test]
    async fn test_write_replaces_prior_entry() {
        let (_db, cache) = test_cache().await;
        let t = 1_700_000_000_000;
        cache.write_at(&FeedPayload::default(), t).await.unwrap();
        cache
            .write_at(&sample_payload(), t + 40 * MINUTE)
            .await
            .unwrap();

        let hit = cache.read_at(t + 41 * MINUTE).await.unwrap();
        assert_eq!(hit.article_data.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_payload_is_miss() {
        let (db, cache) = test_cache().await;
        let t = 1_700_000_000_000;
        let stamp = t.to_string();
        db.set_slots(&[(CACHE_KEY, "{not json"), (CACHE_TIME_KEY, stamp.as_str())])
            .await
            .unwrap();

        assert!(cache.read_at(t + MINUTE).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_timestamp_is_miss() {
        let (db, cache) = test_cache().await;
        let json = serde_json::to_string(&sample_payload()).unwrap();
        db.set_slots(&[(CACHE_KEY, json.as_str()), (CACHE_TIME_KEY, "yesterday")])
            .await
            .unwrap();

        assert!(cache.read_at(1_000).await.is_none());
    }

    #[tokio::test]
    async fn test_timestamp_without_payload_is_miss() {
        let (db, cache) = test_cache().await;
        db.set_slots(&[(CACHE_TIME_KEY, "1000")]).await.unwrap();

        assert!(cache.read_at(2_000).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_entry() {
        let (_db, cache) = test_cache().await;
        cache.write_at(&sample_payload(), 1_000).await.unwrap();

        assert!(cache.clear().await.unwrap());
        assert!(cache.read_at(2_000).await.is_none());
        assert!(!cache.clear().await.unwrap());
    }

    #[test]
    fn test_is_fresh_boundaries() {
        assert!(is_fresh(0, 0));
        assert!(is_fresh(0, CACHE_TTL_MILLIS - 1));
        assert!(!is_fresh(0, CACHE_TTL_MILLIS));
    }
}
