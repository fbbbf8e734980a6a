//! Activity stream types.
//!
//! This module provides the core types for representing a user's activity
//! stream:
//! - [`ActivityType`]: the kind of action an entry describes
//! - [`ActivityEntry`]: one event in a feed, immutable once normalized
//! - [`LookupKey`]: the metadata lookup an entry requires, derived from
//!   its type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of action an activity entry describes.
///
/// Video-related types carry a video id; social types carry the username
/// of the befriended or subscribed-to channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// The author rated a video.
    VideoRated,
    /// The author shared a video.
    VideoShared,
    /// The author favorited a video.
    VideoFavorited,
    /// The author commented on a video.
    VideoCommented,
    /// The author uploaded a video.
    VideoUploaded,
    /// The author added another user as a friend.
    FriendAdded,
    /// The author subscribed to another user's channel.
    UserSubscriptionAdded,
}

impl ActivityType {
    /// Parses an activity type from its wire representation.
    ///
    /// Returns `None` for type strings this version does not know about.
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s {
            "video_rated" => Some(Self::VideoRated),
            "video_shared" => Some(Self::VideoShared),
            "video_favorited" => Some(Self::VideoFavorited),
            "video_commented" => Some(Self::VideoCommented),
            "video_uploaded" => Some(Self::VideoUploaded),
            "friend_added" => Some(Self::FriendAdded),
            "user_subscription_added" => Some(Self::UserSubscriptionAdded),
            _ => None,
        }
    }

    /// Returns the wire representation of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VideoRated => "video_rated",
            Self::VideoShared => "video_shared",
            Self::VideoFavorited => "video_favorited",
            Self::VideoCommented => "video_commented",
            Self::VideoUploaded => "video_uploaded",
            Self::FriendAdded => "friend_added",
            Self::UserSubscriptionAdded => "user_subscription_added",
        }
    }

    /// Returns true if this type refers to a video.
    pub fn is_video_activity(&self) -> bool {
        matches!(
            self,
            Self::VideoRated
                | Self::VideoShared
                | Self::VideoFavorited
                | Self::VideoCommented
                | Self::VideoUploaded
        )
    }

    /// Returns true if this type refers to another user.
    pub fn is_social_activity(&self) -> bool {
        matches!(self, Self::FriendAdded | Self::UserSubscriptionAdded)
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The metadata lookup an entry requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey<'a> {
    /// Look up video metadata by video id.
    Video(&'a str),
    /// Look up user profile metadata by username.
    User(&'a str),
}

/// One event in an activity feed.
///
/// Entries are produced per-request by normalizing the upstream feed
/// response and are not mutated afterwards. Video-typed entries carry
/// `video_id` (and, for ratings, the rating value); social-typed entries
/// carry `username`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Username of the user who performed the action.
    pub author: String,

    /// What kind of action this entry describes.
    pub activity_type: ActivityType,

    /// When the action happened.
    pub updated: DateTime<Utc>,

    /// The video acted on, for video-typed entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,

    /// The user acted on, for social-typed entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// The rating value, for `video_rated` entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl ActivityEntry {
    /// Creates a video-typed entry.
    pub fn video(
        author: impl Into<String>,
        activity_type: ActivityType,
        updated: DateTime<Utc>,
        video_id: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            activity_type,
            updated,
            video_id: Some(video_id.into()),
            username: None,
            rating: None,
        }
    }

    /// Creates a social-typed entry.
    pub fn social(
        author: impl Into<String>,
        activity_type: ActivityType,
        updated: DateTime<Utc>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            activity_type,
            updated,
            video_id: None,
            username: Some(username.into()),
            rating: None,
        }
    }

    /// Builder method to set the rating value.
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Returns the metadata lookup this entry requires.
    ///
    /// Returns `None` when the entry does not carry the id its type calls
    /// for (malformed upstream data); enrichment surfaces the unavailable
    /// sentinel for such entries instead of dropping them.
    pub fn lookup_key(&self) -> Option<LookupKey<'_>> {
        if self.activity_type.is_video_activity() {
            self.video_id.as_deref().map(LookupKey::Video)
        } else {
            self.username.as_deref().map(LookupKey::User)
        }
    }
}
