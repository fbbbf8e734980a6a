//! Enrichment daemon: TTL cache, feed enricher, HTTP surface.
//!
//! This crate provides the tubefeed server that handles:
//! - Metadata caching with TTL and a capacity bound
//! - Per-entry feed enrichment with bounded parallel lookups
//! - The HTTP API serving enriched feeds as flat JSON
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tubefeed_server::{AppState, ServerConfig, serve};
//! use tubefeed_upstream::{AuthContext, YouTubeConfig, YouTubeSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = Arc::new(YouTubeSource::new(YouTubeConfig::default()));
//!     let config = ServerConfig::default();
//!     let state = AppState::new(source, AuthContext::anonymous(), &config);
//!     serve(&config, state).await?;
//!     Ok(())
//! }
//! ```

mod cache;
mod config;
mod enrich;
mod error;
mod http;
#[cfg(test)]
mod test_support;

pub use cache::{DEFAULT_MAX_ENTRIES, TtlCache};
pub use config::ServerConfig;
pub use enrich::{EnrichConfig, FeedEnricher, SharedCache};
pub use error::{ServerError, ServerResult};
pub use http::{AppState, FeedQuery, get_feed, get_friend_feed, healthz, router, serve, whoami};
