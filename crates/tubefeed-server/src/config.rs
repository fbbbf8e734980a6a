//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration.
///
/// TTL values differ between metadata and whole-feed results: metadata
/// (a video's title does not change often) lives much longer than a feed
/// (new activity should show up within minutes).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,

    /// How long resolved metadata stays cached.
    pub metadata_ttl: Duration,

    /// How long a whole enriched feed stays cached.
    pub feed_ttl: Duration,

    /// Bound on entries per cache.
    pub cache_capacity: usize,

    /// How many metadata lookups may run concurrently per request.
    pub lookup_concurrency: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([127, 0, 0, 1], 8080).into(),
            metadata_ttl: Duration::from_secs(24 * 60 * 60),
            feed_ttl: Duration::from_secs(300),
            cache_capacity: crate::cache::DEFAULT_MAX_ENTRIES,
            lookup_concurrency: 8,
        }
    }
}

impl ServerConfig {
    /// Creates a configuration with the given bind address.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            ..Default::default()
        }
    }

    /// Builder: set the metadata TTL.
    pub fn with_metadata_ttl(mut self, ttl: Duration) -> Self {
        self.metadata_ttl = ttl;
        self
    }

    /// Builder: set the whole-feed TTL.
    pub fn with_feed_ttl(mut self, ttl: Duration) -> Self {
        self.feed_ttl = ttl;
        self
    }

    /// Builder: set the per-cache entry bound.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Builder: set the lookup concurrency.
    pub fn with_lookup_concurrency(mut self, concurrency: usize) -> Self {
        self.lookup_concurrency = concurrency.max(1);
        self
    }

    /// Returns the enrichment slice of this configuration.
    pub fn enrich_config(&self) -> crate::enrich::EnrichConfig {
        crate::enrich::EnrichConfig {
            metadata_ttl: self.metadata_ttl,
            cache_capacity: self.cache_capacity,
            lookup_concurrency: self.lookup_concurrency,
        }
    }
}
