use crate::cache::CacheStore;
use crate::error::FetchError;
use crate::failover::Failover;
use crate::types::Payload;
use std::sync::Arc;

/// Cache-aside front for the failover chain.
///
/// Two concurrent misses on the same key both fetch; the later write wins.
pub struct Resolver {
    cache: Arc<CacheStore>,
    failover: Arc<Failover>,
}

impl Resolver {
    pub fn new(cache: Arc<CacheStore>, failover: Arc<Failover>) -> Self {
        Self { cache, failover }
    }

    /// Return the cached payload for `key`, or fetch `path` upstream and
    /// cache the result. Failures are never cached.
    pub async fn resolve(&self, key: &str, path: &str) -> Result<Payload, FetchError> {
        if let Some(cached) = self.cache.get(key) {
            tracing::debug!("Cache hit for {}", key);
            return Ok(cached);
        }

        let fetched = self.failover.fetch(path).await?;
        tracing::info!(
            "Fetched {} from {} ({})",
            key,
            fetched.source,
            fetched.payload.kind()
        );

        self.cache.put(key.to_string(), fetched.payload.clone());
        Ok(fetched.payload)
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn failover(&self) -> &Failover {
        &self.failover
    }
}
