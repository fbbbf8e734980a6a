//! Shared test doubles for enrichment and HTTP handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};

use tubefeed_core::{ActivityEntry, ActivityType, UserMetadata, VideoMetadata};
use tubefeed_upstream::{
    ActivitySource, AuthContext, BoxFuture, FeedTarget, UpstreamError, UpstreamErrorCode,
    UpstreamResult,
};

/// A programmable in-memory source with call counters.
///
/// Lookups for ids that were not configured fail with `NotFound`; the
/// whole feed fetch can be forced to fail with a chosen error code.
pub(crate) struct StubSource {
    videos: HashMap<String, VideoMetadata>,
    users: HashMap<String, UserMetadata>,
    feed: Vec<ActivityEntry>,
    feed_error: Option<UpstreamErrorCode>,
    profile_username: Option<String>,
    video_calls: AtomicUsize,
    user_calls: AtomicUsize,
    feed_calls: AtomicUsize,
}

impl StubSource {
    pub fn new() -> Self {
        Self {
            videos: HashMap::new(),
            users: HashMap::new(),
            feed: Vec::new(),
            feed_error: None,
            profile_username: None,
            video_calls: AtomicUsize::new(0),
            user_calls: AtomicUsize::new(0),
            feed_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_video(mut self, video: VideoMetadata) -> Self {
        self.videos.insert(video.id.clone(), video);
        self
    }

    pub fn with_user_profile(mut self, username: &str) -> Self {
        self.users
            .insert(username.to_string(), UserMetadata::new(username));
        self
    }

    pub fn with_feed(mut self, entries: Vec<ActivityEntry>) -> Self {
        self.feed = entries;
        self
    }

    pub fn with_feed_error(mut self, code: UpstreamErrorCode) -> Self {
        self.feed_error = Some(code);
        self
    }

    pub fn with_profile_username(mut self, username: &str) -> Self {
        self.profile_username = Some(username.to_string());
        self
    }

    pub fn video_calls(&self) -> usize {
        self.video_calls.load(Ordering::SeqCst)
    }

    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    pub fn feed_calls(&self) -> usize {
        self.feed_calls.load(Ordering::SeqCst)
    }
}

impl ActivitySource for StubSource {
    fn name(&self) -> &str {
        "stub"
    }

    fn fetch_activity(
        &self,
        _ctx: AuthContext,
        _target: FeedTarget,
    ) -> BoxFuture<'_, UpstreamResult<Vec<ActivityEntry>>> {
        self.feed_calls.fetch_add(1, Ordering::SeqCst);
        let result = match self.feed_error {
            Some(code) => Err(UpstreamError::new(code, "stub feed failure")),
            None => Ok(self.feed.clone()),
        };
        Box::pin(async move { result })
    }

    fn fetch_video_metadata(
        &self,
        _ctx: AuthContext,
        video_id: &str,
    ) -> BoxFuture<'_, UpstreamResult<VideoMetadata>> {
        self.video_calls.fetch_add(1, Ordering::SeqCst);
        let result = self
            .videos
            .get(video_id)
            .cloned()
            .ok_or_else(|| UpstreamError::not_found(format!("video {} not found", video_id)));
        Box::pin(async move { result })
    }

    fn fetch_user_metadata(
        &self,
        _ctx: AuthContext,
        username: &str,
    ) -> BoxFuture<'_, UpstreamResult<UserMetadata>> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        let result = self
            .users
            .get(username)
            .cloned()
            .ok_or_else(|| UpstreamError::not_found(format!("user {} not found", username)));
        Box::pin(async move { result })
    }

    fn fetch_profile_username(&self, _ctx: AuthContext) -> BoxFuture<'_, UpstreamResult<String>> {
        let result = self
            .profile_username
            .clone()
            .ok_or_else(|| UpstreamError::authentication("no authenticated user"));
        Box::pin(async move { result })
    }
}

/// Video metadata with the fields tests care about.
pub(crate) fn cat_video(id: &str, title: &str, view_count: u64) -> VideoMetadata {
    VideoMetadata {
        id: id.to_string(),
        title: title.to_string(),
        uploader: "uploader".to_string(),
        view_count,
        rating: None,
        thumbnail_url: None,
        player_url: None,
    }
}

/// A `video_uploaded` entry at a fixed timestamp.
pub(crate) fn uploaded_entry(author: &str, video_id: &str) -> ActivityEntry {
    let updated: DateTime<Utc> = "2024-03-15T10:00:00Z".parse().unwrap();
    ActivityEntry::video(author, ActivityType::VideoUploaded, updated, video_id)
}
