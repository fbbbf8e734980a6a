//! Metadata types resolved during feed enrichment.
//!
//! Video and user-profile metadata are fetched lazily from the upstream
//! API and cached with a TTL. A lookup that fails is represented by the
//! [`Enrichment::Unavailable`] sentinel rather than an error, so a single
//! bad lookup never fails a whole feed.

use serde::{Deserialize, Serialize};

/// Summary of a video's rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingInfo {
    /// Average rating across all raters.
    pub average: f64,
    /// Lowest possible rating value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u8>,
    /// Highest possible rating value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u8>,
    /// Number of ratings received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_raters: Option<u64>,
}

/// Metadata for a single video, keyed by video id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// The video id.
    pub id: String,
    /// The video title.
    pub title: String,
    /// Username of the uploader.
    pub uploader: String,
    /// Total view count.
    pub view_count: u64,
    /// Rating summary, if the video has been rated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<RatingInfo>,
    /// URL of the default thumbnail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// URL of the embeddable player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_url: Option<String>,
}

/// Profile metadata for a single user, keyed by username.
///
/// Every field except the username is optional; the upstream API omits
/// anything the user has not filled in, and absent fields are left out
/// of the JSON output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    /// The username.
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_me: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_since: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_count: Option<u64>,
}

impl UserMetadata {
    /// Creates profile metadata with only the username set.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }
}

/// A sentinel value standing in for data that could not be resolved.
///
/// Serializes as a bare JSON string so clients can test for it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentinel {
    /// A recoverable per-entry lookup failure.
    #[serde(rename = "NOT_AVAILABLE")]
    NotAvailable,
    /// A feed-level upstream failure (5xx); the whole response fails.
    #[serde(rename = "SERVER_ERROR")]
    ServerError,
}

/// The result of a metadata lookup: the value, or a sentinel.
///
/// Untagged on the wire: available metadata serializes as its object,
/// the sentinel as its string. Lookup failures are never cached, so a
/// sentinel in one response does not prevent a later retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Enrichment<T> {
    /// The lookup succeeded.
    Available(T),
    /// The lookup failed; display "not available" instead.
    Unavailable(Sentinel),
}

impl<T> Enrichment<T> {
    /// The standard unavailable marker.
    pub fn unavailable() -> Self {
        Self::Unavailable(Sentinel::NotAvailable)
    }

    /// Returns true if metadata was resolved.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Returns the resolved metadata, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Available(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }
}
