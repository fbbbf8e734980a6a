//! Raw activity data from upstream sources.
//!
//! This module defines [`RawActivity`], a source-agnostic representation
//! of one activity feed item as it comes off the wire, before
//! normalization. The raw form keeps the activity type as the upstream
//! string so unknown types can be reported before being dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One activity feed item as returned by a source, prior to
/// normalization into [`tubefeed_core::ActivityEntry`].
///
/// Sources parse their own wire format (JSON field names, timestamp
/// strings) into this struct; [`crate::normalize`] turns it into the
/// typed domain form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawActivity {
    /// Username of the user who performed the action.
    pub author: String,

    /// The upstream activity type string (e.g., "video_uploaded").
    pub activity_type: String,

    /// When the action happened.
    pub updated: DateTime<Utc>,

    /// The video acted on, when the upstream item carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,

    /// The user acted on, when the upstream item carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// The rating value, for rating items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl RawActivity {
    /// Creates a raw activity with the required fields.
    pub fn new(
        author: impl Into<String>,
        activity_type: impl Into<String>,
        updated: DateTime<Utc>,
    ) -> Self {
        Self {
            author: author.into(),
            activity_type: activity_type.into(),
            updated,
            video_id: None,
            username: None,
            rating: None,
        }
    }

    /// Builder method to set the video id.
    pub fn with_video_id(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }

    /// Builder method to set the username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Builder method to set the rating value.
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }
}
