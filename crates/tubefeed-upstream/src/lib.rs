//! ActivitySource trait and implementations.
//!
//! This crate provides the boundary between feed enrichment and the
//! upstream video platform API:
//!
//! - [`ActivitySource`] - The trait all upstream backends implement
//! - [`AuthContext`] - Per-request credentials, passed explicitly
//! - [`RawActivity`] - Source-agnostic raw feed item
//! - [`normalize_activity`] - Conversion from raw items to domain entries
//! - [`UpstreamError`] - Error taxonomy for upstream operations
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ YouTube Data API │
//! └────────┬─────────┘
//!          │ HTTP + JSON
//!          ▼
//! ┌──────────────────┐
//! │  YouTubeSource   │   ActivitySource
//! └────────┬─────────┘
//!          ▼
//!   ┌─────────────┐
//!   │ RawActivity │
//!   └──────┬──────┘
//!          ▼ normalize_activity()
//!   ┌───────────────┐
//!   │ ActivityEntry │
//!   └───────────────┘
//! ```
//!
//! Single-entity lookups (`fetch_video_metadata`, `fetch_user_metadata`)
//! return the core metadata types directly.

pub mod auth;
pub mod error;
pub mod normalize;
pub mod raw_feed;
pub mod source;
pub mod youtube;

// Re-export main types at crate root
pub use auth::AuthContext;
pub use error::{UpstreamError, UpstreamErrorCode, UpstreamResult};
pub use normalize::{normalize_activities, normalize_activity};
pub use raw_feed::RawActivity;
pub use source::{ActivitySource, BoxFuture, ErrorSource, FeedTarget};
pub use youtube::{YouTubeConfig, YouTubeSource};
