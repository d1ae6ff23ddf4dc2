//used parking_lot::RwLock over std::sync::RwLock: no poisoning, and lookups only need a shared lock

use crate::types::Payload;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Payload,
    pub expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Key -> payload map with a fixed time-to-live. Expired entries are dropped
/// by the lookup that finds them; nothing sweeps in the background.
pub struct CacheStore {
    store: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl CacheStore {
    /// A zero `ttl` disables caching: every entry is born expired.
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<Payload> {
        let now = Instant::now();
        {
            let store = self.store.read();
            match store.get(key) {
                Some(entry) if entry.is_fresh(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Re-check under the write lock: a concurrent put may have refreshed it.
        let mut store = self.store.write();
        let now = Instant::now();
        if let Some(entry) = store.get(key) {
            if entry.is_fresh(now) {
                return Some(entry.value.clone());
            }
            store.remove(key);
        }
        None
    }

    pub fn put(&self, key: String, value: Payload) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.store.write().insert(key, entry);
    }

    /// Number of unexpired entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.store
            .read()
            .values()
            .filter(|entry| entry.is_fresh(now))
            .count()
    }
}
