//! YouTube Data API client.
//!
//! A low-level HTTP client for the YouTube Data API's JSON output,
//! handling request building, status mapping, and response parsing into
//! raw structs. Conversion to domain types happens in
//! [`crate::normalize`] (feeds) or inline (single-entity lookups).

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use tubefeed_core::{ActivityEntry, RatingInfo, UserMetadata, VideoMetadata};

use crate::auth::AuthContext;
use crate::error::{UpstreamError, UpstreamResult};
use crate::normalize::normalize_activities;
use crate::raw_feed::RawActivity;
use crate::source::{ActivitySource, BoxFuture, FeedTarget};

/// Base URL for the YouTube Data API.
const API_BASE: &str = "https://gdata.youtube.com";

/// Default request timeout for upstream calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the YouTube source.
#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    /// Base URL of the API.
    pub api_base: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Cap on the number of feed items requested per fetch.
    pub max_results: Option<usize>,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_base: Url::parse(API_BASE).expect("default API base URL is valid"),
            timeout: DEFAULT_TIMEOUT,
            max_results: None,
        }
    }
}

impl YouTubeConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the API base URL.
    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    /// Builder method to set the API base URL from a string.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the string is not a valid URL.
    pub fn with_api_base_str(self, api_base: &str) -> UpstreamResult<Self> {
        let url = Url::parse(api_base).map_err(|e| {
            UpstreamError::configuration(format!("invalid API base URL '{}': {}", api_base, e))
        })?;
        Ok(self.with_api_base(url))
    }

    /// Builder method to set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method to cap feed fetch size.
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }
}

/// YouTube Data API source.
#[derive(Debug)]
pub struct YouTubeSource {
    http_client: reqwest::Client,
    config: YouTubeConfig,
}

impl YouTubeSource {
    /// Creates a new YouTube source with the given configuration.
    pub fn new(config: YouTubeConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http_client,
            config,
        }
    }

    fn base(&self) -> &str {
        self.config.api_base.as_str().trim_end_matches('/')
    }

    /// Issues a GET request and parses the JSON body.
    ///
    /// Maps HTTP status codes onto the error taxonomy; `what` names the
    /// entity for not-found messages.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        ctx: &AuthContext,
        url: String,
        what: &str,
    ) -> UpstreamResult<T> {
        let mut request = self
            .http_client
            .get(&url)
            .query(&[("alt", "jsonc"), ("v", "2")]);

        if let Some(max) = self.config.max_results {
            request = request.query(&[("max-results", max.to_string())]);
        }

        request = ctx.apply(request);

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::network("request timeout")
            } else if e.is_connect() {
                UpstreamError::network(format!("connection failed: {}", e))
            } else {
                UpstreamError::network(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(UpstreamError::authentication(
                "access token expired or invalid",
            ));
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(UpstreamError::authorization(format!(
                "access denied to {}",
                what
            )));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(UpstreamError::not_found(format!("{} not found", what)));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(UpstreamError::rate_limited(format!(
                "rate limit exceeded{}",
                retry_after
                    .map(|s| format!(", retry after {} seconds", s))
                    .unwrap_or_default()
            )));
        }

        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::server(format!(
                "API error ({}): {}",
                status, body
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::bad_request(format!(
                "API error ({}): {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::network(format!("failed to read response: {}", e)))?;

        serde_json::from_str(&body)
            .map_err(|e| UpstreamError::invalid_response(format!("failed to parse response: {}", e)))
    }
}

impl ActivitySource for YouTubeSource {
    fn name(&self) -> &str {
        "youtube"
    }

    fn fetch_activity(
        &self,
        ctx: AuthContext,
        target: FeedTarget,
    ) -> BoxFuture<'_, UpstreamResult<Vec<ActivityEntry>>> {
        let url = match &target {
            FeedTarget::User(username) => format!(
                "{}/feeds/api/users/{}/events",
                self.base(),
                urlencoding::encode(username)
            ),
            FeedTarget::Friends => {
                format!("{}/feeds/api/users/default/friendsactivity", self.base())
            }
        };

        Box::pin(async move {
            let response: ApiActivityFeed = self.get_json(&ctx, url, "activity feed").await?;
            let raws = convert_items(response.data.items);
            let entries = normalize_activities(raws);
            debug!(count = entries.len(), "fetched activity feed");
            Ok(entries)
        })
    }

    fn fetch_video_metadata(
        &self,
        ctx: AuthContext,
        video_id: &str,
    ) -> BoxFuture<'_, UpstreamResult<VideoMetadata>> {
        let video_id = video_id.to_string();
        let url = format!(
            "{}/feeds/api/videos/{}",
            self.base(),
            urlencoding::encode(&video_id)
        );

        Box::pin(async move {
            let response: ApiVideoResponse = self.get_json(&ctx, url, "video").await?;
            Ok(convert_video(response.data, &video_id))
        })
    }

    fn fetch_user_metadata(
        &self,
        ctx: AuthContext,
        username: &str,
    ) -> BoxFuture<'_, UpstreamResult<UserMetadata>> {
        let username = username.to_string();
        let url = format!(
            "{}/feeds/api/users/{}",
            self.base(),
            urlencoding::encode(&username)
        );

        Box::pin(async move {
            let response: ApiUserResponse = self.get_json(&ctx, url, "user profile").await?;
            Ok(convert_profile(response.data, &username))
        })
    }

    fn fetch_profile_username(&self, ctx: AuthContext) -> BoxFuture<'_, UpstreamResult<String>> {
        let url = format!("{}/feeds/api/users/default", self.base());

        Box::pin(async move {
            let response: ApiUserResponse = self.get_json(&ctx, url, "user profile").await?;
            response.data.username.ok_or_else(|| {
                UpstreamError::invalid_response("profile response carries no username")
            })
        })
    }
}

/// Converts API feed items into raw activities, dropping items that are
/// unusable (no author, type, or parseable timestamp).
fn convert_items(items: Vec<ApiActivityItem>) -> Vec<RawActivity> {
    items
        .into_iter()
        .filter_map(|item| {
            let Some(author) = item.author else {
                warn!("dropping activity item without author");
                return None;
            };
            let Some(activity_type) = item.activity_type else {
                warn!(author = %author, "dropping activity item without type");
                return None;
            };
            let updated = item.updated.as_deref().and_then(|s| {
                DateTime::parse_from_rfc3339(s)
                    .map_err(|e| warn!(author = %author, "unparseable activity timestamp: {}", e))
                    .ok()
            })?;

            let mut raw = RawActivity::new(author, activity_type, updated.with_timezone(&Utc));
            raw.video_id = item.video_id;
            raw.username = item.username;
            raw.rating = item.rating;
            Some(raw)
        })
        .collect()
}

fn convert_video(video: ApiVideo, requested_id: &str) -> VideoMetadata {
    VideoMetadata {
        id: video.id.unwrap_or_else(|| requested_id.to_string()),
        title: video.title.unwrap_or_default(),
        uploader: video.uploader.unwrap_or_default(),
        view_count: video.view_count.unwrap_or(0),
        rating: video.rating.and_then(|r| {
            r.average.map(|average| RatingInfo {
                average,
                min: r.min,
                max: r.max,
                num_raters: r.num_raters,
            })
        }),
        thumbnail_url: video.thumbnail.and_then(|t| t.hq_default.or(t.sq_default)),
        player_url: video.player.and_then(|p| p.default),
    }
}

fn convert_profile(profile: ApiUserProfile, requested_username: &str) -> UserMetadata {
    UserMetadata {
        username: profile
            .username
            .unwrap_or_else(|| requested_username.to_string()),
        about_me: profile.about_me,
        first_name: profile.first_name,
        last_name: profile.last_name,
        location: profile.location,
        thumbnail_url: profile.thumbnail_url,
        member_since: profile.member_since,
        channel_views: profile.channel_views,
        subscriber_count: profile.subscriber_count,
        upload_count: profile.upload_count,
    }
}

/// Response from an activity feed endpoint.
#[derive(Debug, Deserialize)]
struct ApiActivityFeed {
    data: ApiActivityData,
}

#[derive(Debug, Deserialize)]
struct ApiActivityData {
    #[serde(default)]
    items: Vec<ApiActivityItem>,
}

/// A single activity item from the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiActivityItem {
    author: Option<String>,
    #[serde(rename = "type")]
    activity_type: Option<String>,
    updated: Option<String>,
    video_id: Option<String>,
    username: Option<String>,
    rating: Option<u8>,
}

/// Response from the video endpoint.
#[derive(Debug, Deserialize)]
struct ApiVideoResponse {
    data: ApiVideo,
}

/// A single video from the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiVideo {
    id: Option<String>,
    title: Option<String>,
    uploader: Option<String>,
    view_count: Option<u64>,
    rating: Option<ApiRating>,
    thumbnail: Option<ApiThumbnail>,
    player: Option<ApiPlayer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRating {
    average: Option<f64>,
    min: Option<u8>,
    max: Option<u8>,
    num_raters: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiThumbnail {
    sq_default: Option<String>,
    hq_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiPlayer {
    default: Option<String>,
}

/// Response from a user profile endpoint.
#[derive(Debug, Deserialize)]
struct ApiUserResponse {
    data: ApiUserProfile,
}

/// A user profile from the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUserProfile {
    username: Option<String>,
    about_me: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    location: Option<String>,
    thumbnail_url: Option<String>,
    member_since: Option<String>,
    channel_views: Option<u64>,
    subscriber_count: Option<u64>,
    upload_count: Option<u64>,
}
