use super::CacheBackend;
use async_trait::async_trait;
use serde_json::Value;

/// NullCache is a cache implementation that does nothing.
/// It is used when caching is disabled, so every introspection goes to the
/// authorization server.
#[derive(Clone, Debug)]
pub struct NullCache;

impl NullCache {
    /// Create a new NullCache instance
    pub fn new() -> Self {
        NullCache
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for NullCache {
    async fn get(&self, _token: &str) -> Option<Value> {
        None
    }

    async fn put(&self, _token: &str, _raw: Value) {}

    async fn health_check(&self) -> Result<(), String> {
        // NullCache is always healthy as it doesn't hold any state
        Ok(())
    }
}
