//! Transient cache for fetch results
//!
//! A tiny TTL key/value store. Values are opaque to the cache and expired
//! entries behave exactly like absent ones. Deadlines use the tokio clock so
//! tests can drive expiry with `tokio::time::advance`.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::RwLock;
use std::time::Duration;
use tokio::time::Instant;

/// Key/value store with per-entry time to live
pub trait TransientStore<V>: Send + Sync {
    /// Return the value for `key` unless it is absent or expired
    fn get(&self, key: &str) -> Option<V>;

    /// Insert or overwrite `key`, valid for `ttl` from now
    fn set(&self, key: &str, value: V, ttl: Duration);
}

/// Build a cache key from a prefix and the request shape (`stromtarife_10`)
pub fn cache_key(prefix: &str, shape: impl Display) -> String {
    format!("{}_{}", prefix, shape)
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// In-process [`TransientStore`] backed by a `HashMap`
#[derive(Debug)]
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Clone> MemoryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone + Send + Sync> TransientStore<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;
        if entry.expires_at > Instant::now() {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    fn set(&self, key: &str, value: V, ttl: Duration) {
        let Ok(mut entries) = self.entries.write() else {
            return;
        };
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_format() {
        assert_eq!(cache_key("stromtarife", 10), "stromtarife_10");
        assert_eq!(cache_key("stromgraph", "range"), "stromgraph_range");
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_within_ttl_returns_value() {
        let cache = MemoryCache::new();
        cache.set("k", "v".to_string(), Duration::from_secs(60));
        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("k"), Some("v".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_after_ttl_is_miss() {
        let cache = MemoryCache::new();
        cache.set("k", 7_u32, Duration::from_secs(60));
        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_absent_key_is_miss() {
        let cache: MemoryCache<u32> = MemoryCache::new();
        assert_eq!(cache.get("missing"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_overwrites_and_purges_expired() {
        let cache = MemoryCache::new();
        cache.set("old", 1_u32, Duration::from_secs(5));
        cache.set("k", 1_u32, Duration::from_secs(60));
        cache.set("k", 2_u32, Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 2);

        tokio::time::advance(Duration::from_secs(10)).await;
        cache.set("new", 3_u32, Duration::from_secs(60));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("old"), None);
    }
}
