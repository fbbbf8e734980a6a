//! Feed enrichment.
//!
//! [`FeedEnricher`] turns a raw sequence of activity entries into an
//! [`EnrichedFeed`]: every video-typed entry gets its video metadata
//! resolved, every social-typed entry its user profile, through the
//! metadata caches with the upstream API as fallback.
//!
//! Entries are enriched independently: one failed lookup degrades that
//! entry to the unavailable sentinel and never aborts the rest. Lookups
//! run concurrently up to a bound, but the output order always matches
//! the input order.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use tubefeed_core::{
    ActivityEntry, EnrichedEntry, EnrichedFeed, Enrichment, LookupKey, UserMetadata, VideoMetadata,
};
use tubefeed_upstream::{ActivitySource, AuthContext};

use crate::cache::TtlCache;

/// A metadata cache shared across request tasks.
pub type SharedCache<V> = Arc<RwLock<TtlCache<V>>>;

/// Enrichment tuning knobs.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// How long resolved metadata stays cached.
    pub metadata_ttl: Duration,
    /// Bound on entries per metadata cache.
    pub cache_capacity: usize,
    /// How many lookups may run concurrently per request.
    pub lookup_concurrency: usize,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            metadata_ttl: Duration::from_secs(24 * 60 * 60),
            cache_capacity: crate::cache::DEFAULT_MAX_ENTRIES,
            lookup_concurrency: 8,
        }
    }
}

/// Resolves per-entry metadata for activity feeds.
///
/// Holds the two metadata caches; construct one at process start and
/// share it across requests. Concurrent requests racing on the same
/// entity may both fetch upstream; the second write simply replaces the
/// first.
pub struct FeedEnricher {
    source: Arc<dyn ActivitySource>,
    videos: SharedCache<VideoMetadata>,
    users: SharedCache<UserMetadata>,
    config: EnrichConfig,
}

impl FeedEnricher {
    /// Creates an enricher over the given source.
    pub fn new(source: Arc<dyn ActivitySource>, config: EnrichConfig) -> Self {
        let videos = Arc::new(RwLock::new(TtlCache::new(
            config.metadata_ttl,
            config.cache_capacity,
        )));
        let users = Arc::new(RwLock::new(TtlCache::new(
            config.metadata_ttl,
            config.cache_capacity,
        )));
        Self {
            source,
            videos,
            users,
            config,
        }
    }

    /// Returns the video metadata cache.
    pub fn video_cache(&self) -> SharedCache<VideoMetadata> {
        Arc::clone(&self.videos)
    }

    /// Returns the user metadata cache.
    pub fn user_cache(&self) -> SharedCache<UserMetadata> {
        Arc::clone(&self.users)
    }

    /// Enriches a feed, preserving input order and length.
    ///
    /// This never fails: lookups that cannot be resolved surface the
    /// unavailable sentinel in their entry.
    pub async fn enrich(&self, ctx: &AuthContext, entries: Vec<ActivityEntry>) -> EnrichedFeed {
        let concurrency = self.config.lookup_concurrency.max(1);
        let enriched: Vec<EnrichedEntry> = stream::iter(entries)
            .map(|entry| self.enrich_entry(ctx, entry))
            .buffered(concurrency)
            .collect()
            .await;
        EnrichedFeed(enriched)
    }

    /// Enriches a single entry; infallible by construction.
    async fn enrich_entry(&self, ctx: &AuthContext, entry: ActivityEntry) -> EnrichedEntry {
        let mut enriched = EnrichedEntry::from_activity(&entry);

        match entry.lookup_key() {
            Some(LookupKey::Video(video_id)) => {
                enriched.video_info = Some(self.video_info(ctx, video_id).await);
            }
            Some(LookupKey::User(username)) => {
                enriched.user_info = Some(self.user_info(ctx, username).await);
            }
            None => {
                // The entry lacks the id its type calls for; degrade
                // without touching the upstream.
                warn!(
                    activity_type = %entry.activity_type,
                    author = %entry.author,
                    "activity entry is missing its lookup id"
                );
                if entry.activity_type.is_video_activity() {
                    enriched.video_info = Some(Enrichment::unavailable());
                } else {
                    enriched.user_info = Some(Enrichment::unavailable());
                }
            }
        }

        enriched
    }

    async fn video_info(&self, ctx: &AuthContext, video_id: &str) -> Enrichment<VideoMetadata> {
        let cached = self.videos.read().await.get(video_id).cloned();
        if let Some(metadata) = cached {
            debug!(video_id = %video_id, "video metadata cache hit");
            return Enrichment::Available(metadata);
        }

        match self
            .source
            .fetch_video_metadata(ctx.clone(), video_id)
            .await
        {
            Ok(metadata) => {
                self.videos.write().await.insert_with_ttl(
                    video_id,
                    metadata.clone(),
                    self.config.metadata_ttl,
                );
                Enrichment::Available(metadata)
            }
            Err(err) => {
                // Failures are not cached so the next attempt retries.
                warn!(video_id = %video_id, error = %err, "video metadata lookup failed");
                Enrichment::unavailable()
            }
        }
    }

    async fn user_info(&self, ctx: &AuthContext, username: &str) -> Enrichment<UserMetadata> {
        let cached = self.users.read().await.get(username).cloned();
        if let Some(metadata) = cached {
            debug!(username = %username, "user metadata cache hit");
            return Enrichment::Available(metadata);
        }

        match self.source.fetch_user_metadata(ctx.clone(), username).await {
            Ok(metadata) => {
                self.users.write().await.insert_with_ttl(
                    username,
                    metadata.clone(),
                    self.config.metadata_ttl,
                );
                Enrichment::Available(metadata)
            }
            Err(err) => {
                warn!(username = %username, error = %err, "user metadata lookup failed");
                Enrichment::unavailable()
            }
        }
    }
}
