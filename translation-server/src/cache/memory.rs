use super::{token_key, CacheBackend};
use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use moka::policy::EvictionPolicy;
use serde_json::Value;
use std::time::Duration;

/// Bounded in-memory cache of introspection responses.
///
/// Entries expire `ttl` after insertion; reads never extend an entry's life, so
/// a revoked token is re-validated at most `ttl` after it was first seen.
/// When `capacity` entries are stored, the least recently used entry is evicted.
/// Expired entries are dropped lazily on access or during moka's maintenance.
#[derive(Clone)]
pub struct InMemoryCache {
    cache: MokaCache<String, Value>,
}

impl InMemoryCache {
    /// Initialize a new in-memory cache instance
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(ttl)
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self { cache }
    }

    /// Number of live entries, as of moka's last maintenance run
    #[cfg(test)]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Apply pending evictions and expirations immediately
    #[cfg(test)]
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

#[async_trait]
impl CacheBackend for InMemoryCache {
    async fn get(&self, token: &str) -> Option<Value> {
        self.cache.get(&token_key(token)).await
    }

    async fn put(&self, token: &str, raw: Value) {
        self.cache.insert(token_key(token), raw).await;
    }

    async fn health_check(&self) -> Result<(), String> {
        Ok(())
    }
}
