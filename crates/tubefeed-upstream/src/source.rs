//! ActivitySource trait definition.
//!
//! This module defines the [`ActivitySource`] trait, the boundary between
//! the enrichment logic and the upstream video platform API.
//!
//! Sources are responsible for:
//! - Fetching activity feeds and per-entity metadata
//! - Applying request credentials
//! - Mapping transport failures to the [`UpstreamError`] taxonomy

use std::future::Future;
use std::pin::Pin;

use tubefeed_core::{ActivityEntry, UserMetadata, VideoMetadata};

use crate::auth::AuthContext;
use crate::error::{UpstreamError, UpstreamResult};

/// Which activity feed to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedTarget {
    /// The named user's own activity.
    User(String),
    /// The activity of the authenticated user's friends.
    Friends,
}

impl FeedTarget {
    /// Creates a user-feed target.
    pub fn user(username: impl Into<String>) -> Self {
        Self::User(username.into())
    }

    /// Returns the result-cache key for this target.
    ///
    /// `owner` is the authenticated username; friend feeds are cached per
    /// owner so one user's social graph never leaks into another's view.
    pub fn cache_key(&self, owner: &str) -> String {
        match self {
            Self::User(username) => format!("useractivity-{}", username),
            Self::Friends => format!("friendactivity-{}", owner),
        }
    }
}

/// A boxed future for async trait methods.
///
/// Boxing keeps the trait object-safe so the server can hold an
/// `Arc<dyn ActivitySource>` and tests can swap in stubs.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The boundary between enrichment and the upstream API.
///
/// Implementations must be `Send + Sync`; they are shared across request
/// tasks behind an `Arc`. Credentials arrive per call in an
/// [`AuthContext`]; implementations hold no ambient session state.
///
/// # Errors
///
/// All methods report failures through [`UpstreamError`]. Callers decide
/// the degradation: metadata lookups degrade to a per-entry sentinel,
/// feed fetches fail the whole request.
pub trait ActivitySource: Send + Sync {
    /// Returns the name of this source (e.g., "youtube").
    fn name(&self) -> &str;

    /// Fetches an activity feed, normalized into [`ActivityEntry`] values
    /// in upstream order.
    fn fetch_activity(
        &self,
        ctx: AuthContext,
        target: FeedTarget,
    ) -> BoxFuture<'_, UpstreamResult<Vec<ActivityEntry>>>;

    /// Fetches metadata for a single video.
    fn fetch_video_metadata(
        &self,
        ctx: AuthContext,
        video_id: &str,
    ) -> BoxFuture<'_, UpstreamResult<VideoMetadata>>;

    /// Fetches profile metadata for a single user.
    fn fetch_user_metadata(
        &self,
        ctx: AuthContext,
        username: &str,
    ) -> BoxFuture<'_, UpstreamResult<UserMetadata>>;

    /// Resolves the username of the authenticated principal.
    fn fetch_profile_username(&self, ctx: AuthContext) -> BoxFuture<'_, UpstreamResult<String>>;
}

/// A source that always returns an error.
///
/// Useful as a placeholder when a source fails to initialize, and in
/// tests that exercise failure paths.
#[derive(Debug)]
pub struct ErrorSource {
    name: String,
    error: UpstreamError,
}

impl ErrorSource {
    /// Creates a new error source.
    pub fn new(name: impl Into<String>, error: UpstreamError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }

    // UpstreamError is not Clone; rebuild it from its parts.
    fn replay(&self) -> UpstreamError {
        UpstreamError::new(self.error.code(), self.error.message()).with_source_name(&self.name)
    }
}

impl ActivitySource for ErrorSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_activity(
        &self,
        _ctx: AuthContext,
        _target: FeedTarget,
    ) -> BoxFuture<'_, UpstreamResult<Vec<ActivityEntry>>> {
        let error = self.replay();
        Box::pin(async move { Err(error) })
    }

    fn fetch_video_metadata(
        &self,
        _ctx: AuthContext,
        _video_id: &str,
    ) -> BoxFuture<'_, UpstreamResult<VideoMetadata>> {
        let error = self.replay();
        Box::pin(async move { Err(error) })
    }

    fn fetch_user_metadata(
        &self,
        _ctx: AuthContext,
        _username: &str,
    ) -> BoxFuture<'_, UpstreamResult<UserMetadata>> {
        let error = self.replay();
        Box::pin(async move { Err(error) })
    }

    fn fetch_profile_username(&self, _ctx: AuthContext) -> BoxFuture<'_, UpstreamResult<String>> {
        let error = self.replay();
        Box::pin(async move { Err(error) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_target_cache_keys() {
        let user = FeedTarget::user("alice");
        assert_eq!(user.cache_key("carol"), "useractivity-alice");

        let friends = FeedTarget::Friends;
        assert_eq!(friends.cache_key("carol"), "friendactivity-carol");
    }

    #[tokio::test]
    async fn error_source_fails_everything() {
        let source = ErrorSource::new("test", UpstreamError::configuration("not configured"));

        assert_eq!(source.name(), "test");

        let feed = source
            .fetch_activity(AuthContext::anonymous(), FeedTarget::user("alice"))
            .await;
        assert!(feed.is_err());

        let video = source
            .fetch_video_metadata(AuthContext::anonymous(), "abc123")
            .await;
        let err = video.unwrap_err();
        assert_eq!(err.source_name(), Some("test"));

        let whoami = source.fetch_profile_username(AuthContext::anonymous()).await;
        assert!(whoami.is_err());
    }
}
