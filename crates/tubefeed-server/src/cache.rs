//! Metadata cache with TTL (Time-To-Live) support.
//!
//! This module provides [`TtlCache`], a bounded key-value cache whose
//! entries expire after a fixed duration. A read at or after expiry is a
//! miss, never stale data. The cache is process-local: a miss always
//! falls through to the upstream fetch, so cache trouble can degrade
//! latency but never a request.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

/// Default bound on the number of live entries.
pub const DEFAULT_MAX_ENTRIES: usize = 4096;

/// One cached value with its expiration time.
#[derive(Debug, Clone)]
struct CacheSlot<V> {
    value: V,
    /// When the slot expires (monotonic clock).
    expires_at: Instant,
}

impl<V> CacheSlot<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// A bounded key-value cache with per-entry TTL.
///
/// Expiry is the only staleness rule; there is no recency tracking.
/// When the cache is full, expired slots are evicted first, then the
/// slot closest to expiry is dropped to make room.
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Default TTL for new entries.
    default_ttl: Duration,
    /// Bound on the number of entries.
    max_entries: usize,
    /// Live slots keyed by entity id.
    entries: HashMap<String, CacheSlot<V>>,
}

impl<V> TtlCache<V> {
    /// Creates a cache with the given default TTL and entry bound.
    pub fn new(default_ttl: Duration, max_entries: usize) -> Self {
        Self {
            default_ttl,
            max_entries: max_entries.max(1),
            entries: HashMap::new(),
        }
    }

    /// Creates a cache with the given default TTL and the default bound.
    pub fn with_default_capacity(default_ttl: Duration) -> Self {
        Self::new(default_ttl, DEFAULT_MAX_ENTRIES)
    }

    /// Returns the default TTL.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the entry bound.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Returns the cached value for `key` if present and not expired.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|slot| !slot.is_expired())
            .map(|slot| &slot.value)
    }

    /// Returns true if `key` is present and not expired.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts or replaces a value with the default TTL.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let ttl = self.default_ttl;
        self.insert_with_ttl(key, value, ttl);
    }

    /// Inserts or replaces a value with a custom TTL.
    pub fn insert_with_ttl(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        if !self.entries.contains_key(&key) {
            self.make_room();
        }
        self.entries.insert(key.clone(), CacheSlot::new(value, ttl));
        debug!(key = %key, ttl_secs = ttl.as_secs(), "stored cache entry");
    }

    /// Removes an entry, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let removed = self.entries.remove(key).map(|slot| slot.value);
        if removed.is_some() {
            debug!(key = %key, "removed cache entry");
        }
        removed
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        debug!(count = count, "cleared cache");
    }

    /// Removes all expired entries, returning how many were dropped.
    pub fn evict_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, slot| {
            let keep = !slot.is_expired();
            if !keep {
                trace!(key = %key, "evicting expired cache entry");
            }
            keep
        });
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted = evicted, "evicted expired cache entries");
        }
        evicted
    }

    /// Returns the number of entries (expired-but-unevicted included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Makes room for one more entry when at the bound.
    ///
    /// Expired slots go first; if the cache is still full, the slot
    /// closest to expiry is dropped.
    fn make_room(&mut self) {
        if self.entries.len() < self.max_entries {
            return;
        }
        self.evict_expired();
        while self.entries.len() >= self.max_entries {
            let victim = self
                .entries
                .iter()
                .min_by_key(|(_, slot)| slot.expires_at)
                .map(|(key, _)| key.clone());
            match victim {
                Some(key) => {
                    self.entries.remove(&key);
                    debug!(key = %key, "evicted cache entry to stay within bound");
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn insert_and_get() {
        let mut cache = TtlCache::new(Duration::from_secs(60), 16);

        cache.insert("video-abc", "metadata");
        assert_eq!(cache.get("video-abc"), Some(&"metadata"));
        assert!(cache.contains("video-abc"));

        assert!(cache.get("video-missing").is_none());
        assert!(!cache.contains("video-missing"));
    }

    #[test]
    fn expired_read_is_a_miss() {
        let mut cache = TtlCache::new(Duration::from_millis(50), 16);

        cache.insert("video-abc", "metadata");
        assert!(cache.contains("video-abc"));

        thread::sleep(Duration::from_millis(60));
        assert!(cache.get("video-abc").is_none());
    }

    #[test]
    fn insert_overwrites() {
        let mut cache = TtlCache::new(Duration::from_secs(60), 16);

        cache.insert("video-abc", 1);
        cache.insert("video-abc", 2);

        assert_eq!(cache.get("video-abc"), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn custom_ttl_outlives_default() {
        let mut cache = TtlCache::new(Duration::from_millis(50), 16);

        cache.insert("short", 1);
        cache.insert_with_ttl("long", 2, Duration::from_secs(60));

        thread::sleep(Duration::from_millis(60));
        assert!(cache.get("short").is_none());
        assert_eq!(cache.get("long"), Some(&2));
    }

    #[test]
    fn evict_expired_drops_only_expired() {
        let mut cache = TtlCache::new(Duration::from_millis(50), 16);

        cache.insert("a", 1);
        cache.insert_with_ttl("b", 2, Duration::from_secs(60));

        thread::sleep(Duration::from_millis(60));

        let evicted = cache.evict_expired();
        assert_eq!(evicted, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("b"));
    }

    #[test]
    fn bound_evicts_closest_to_expiry() {
        let mut cache = TtlCache::new(Duration::from_secs(60), 2);

        cache.insert_with_ttl("soon", 1, Duration::from_secs(10));
        cache.insert_with_ttl("later", 2, Duration::from_secs(100));
        cache.insert_with_ttl("newest", 3, Duration::from_secs(50));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("soon").is_none());
        assert_eq!(cache.get("later"), Some(&2));
        assert_eq!(cache.get("newest"), Some(&3));
    }

    #[test]
    fn overwrite_at_bound_does_not_evict_others() {
        let mut cache = TtlCache::new(Duration::from_secs(60), 2);

        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(&3));
        assert_eq!(cache.get("b"), Some(&2));
    }

    #[test]
    fn remove_and_clear() {
        let mut cache = TtlCache::new(Duration::from_secs(60), 16);

        cache.insert("a", 1);
        cache.insert("b", 2);

        assert_eq!(cache.remove("a"), Some(1));
        assert!(cache.remove("a").is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_bound_is_clamped() {
        let mut cache = TtlCache::new(Duration::from_secs(60), 0);
        cache.insert("a", 1);
        assert_eq!(cache.get("a"), Some(&1));
        assert_eq!(cache.max_entries(), 1);
    }
}
