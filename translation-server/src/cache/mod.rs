use crate::config::CacheConfig;
use log::info;
use serde_json::Value;
use sha2::{Digest, Sha256};

pub mod memory;
pub mod null;

/// Contract shared by all credential cache backends.
///
/// Values are the raw JSON bodies returned by the introspection endpoint.
/// Callers always receive an owned copy, so a cached value can never be
/// mutated through a handle returned by `get`.
///
/// The cache is best-effort: it has no observable failure modes, a miss
/// only costs an extra remote call.
#[async_trait::async_trait]
pub trait CacheBackend: Send + Sync {
    /// Retrieve the stored response for a token if present and not expired
    async fn get(&self, token: &str) -> Option<Value>;

    /// Insert or replace the stored response for a token
    async fn put(&self, token: &str, raw: Value);

    /// Checks that the backend is usable
    async fn health_check(&self) -> Result<(), String>;
}

/// Credential cache implementation that provides a uniform interface regardless of backend.
///
/// The concrete backend is chosen at startup from the cache configuration.
#[derive(Clone)]
pub enum CredentialCache {
    /// In-memory cache implementation using Moka
    InMemory(memory::InMemoryCache),
    /// No-op cache used when caching is disabled
    Null(null::NullCache),
}

#[async_trait::async_trait]
impl CacheBackend for CredentialCache {
    async fn get(&self, token: &str) -> Option<Value> {
        match self {
            Self::InMemory(cache) => cache.get(token).await,
            Self::Null(cache) => cache.get(token).await,
        }
    }

    async fn put(&self, token: &str, raw: Value) {
        match self {
            Self::InMemory(cache) => cache.put(token, raw).await,
            Self::Null(cache) => cache.put(token, raw).await,
        }
    }

    async fn health_check(&self) -> Result<(), String> {
        match self {
            Self::InMemory(cache) => cache.health_check().await,
            Self::Null(cache) => cache.health_check().await,
        }
    }
}

/// Create the credential cache selected by the configuration
pub fn create_cache(config: &CacheConfig) -> CredentialCache {
    if config.is_enabled() {
        info!(
            "Introspection cache enabled: ttl={}s capacity={}",
            config.ttl, config.capacity
        );
        CredentialCache::InMemory(memory::InMemoryCache::new(config.ttl(), config.capacity))
    } else {
        info!("Introspection cache disabled");
        CredentialCache::Null(null::NullCache::new())
    }
}

/// Derives the map key for a bearer token.
///
/// The digest is one-to-one with the token for all practical purposes and keeps
/// raw credentials out of the cache's key space.
pub(crate) fn token_key(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
