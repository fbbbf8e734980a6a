//! Core types: activity entries, metadata, enriched feeds

pub mod activity;
pub mod feed;
pub mod metadata;
pub mod tracing;

pub use activity::{ActivityEntry, ActivityType, LookupKey};
pub use feed::{EnrichedEntry, EnrichedFeed};
pub use metadata::{Enrichment, RatingInfo, Sentinel, UserMetadata, VideoMetadata};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
