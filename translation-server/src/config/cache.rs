use confique::Config;
use std::time::Duration;

/// Configuration for the introspection result cache
#[derive(Debug, Config, Clone)]
pub struct CacheConfig {
    /// Cache TTL in seconds, measured from insertion. 0 disables caching (default: 30)
    #[config(env = "AUTH_CACHE_TTL", default = 30)]
    pub ttl: u64,

    /// Maximum number of cached tokens (default: 1024)
    #[config(env = "AUTH_CACHE_CAPACITY", default = 1024)]
    pub capacity: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl)
    }

    /// Whether the cache should actually store entries
    pub fn is_enabled(&self) -> bool {
        self.ttl > 0 && self.capacity > 0
    }
}
