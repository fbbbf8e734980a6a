//! Enriched feed output types.
//!
//! [`EnrichedFeed`] is the flat, JSON-serializable result of enrichment:
//! every entry carries its resolved metadata (or the unavailable
//! sentinel) inline, in the same order as the input feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::{ActivityEntry, ActivityType};
use crate::metadata::{Enrichment, UserMetadata, VideoMetadata};

/// One activity entry paired with its resolved metadata.
///
/// Video-typed entries end up with `video_info` set (metadata or
/// sentinel, never absent); social-typed entries likewise end up with
/// `user_info`. Fields that do not apply to the entry's type are omitted
/// from the JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedEntry {
    /// Username of the user who performed the action.
    pub author: String,

    /// What kind of action this entry describes.
    pub activity_type: ActivityType,

    /// When the action happened (RFC 3339).
    pub updated: DateTime<Utc>,

    /// The video acted on, for video-typed entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,

    /// The rating value, for `video_rated` entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,

    /// Resolved video metadata, for video-typed entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_info: Option<Enrichment<VideoMetadata>>,

    /// The user acted on, for social-typed entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Resolved profile metadata, for social-typed entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<Enrichment<UserMetadata>>,
}

impl EnrichedEntry {
    /// Creates an entry from its activity, with no metadata attached yet.
    pub fn from_activity(entry: &ActivityEntry) -> Self {
        Self {
            author: entry.author.clone(),
            activity_type: entry.activity_type,
            updated: entry.updated,
            video_id: entry.video_id.clone(),
            rating: entry.rating,
            video_info: None,
            username: entry.username.clone(),
            user_info: None,
        }
    }
}

/// An ordered sequence of enriched entries.
///
/// Serializes as a plain JSON array. Order always matches the input
/// feed; enrichment never reorders or de-duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrichedFeed(pub Vec<EnrichedEntry>);

impl EnrichedFeed {
    /// Creates an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the feed has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the entries in feed order.
    pub fn iter(&self) -> impl Iterator<Item = &EnrichedEntry> {
        self.0.iter()
    }
}

impl From<Vec<EnrichedEntry>> for EnrichedFeed {
    fn from(entries: Vec<EnrichedEntry>) -> Self {
        Self(entries)
    }
}

impl IntoIterator for EnrichedFeed {
    type Item = EnrichedEntry;
    type IntoIter = std::vec::IntoIter<EnrichedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2024-03-15T10:00:00Z".parse().unwrap()
    }

    fn uploaded(video_id: &str) -> EnrichedEntry {
        let entry = ActivityEntry::video("alice", ActivityType::VideoUploaded, now(), video_id);
        EnrichedEntry::from_activity(&entry)
    }

    #[test]
    fn from_activity_copies_base_fields() {
        let entry = ActivityEntry::video("alice", ActivityType::VideoRated, now(), "abc123")
            .with_rating(4);
        let enriched = EnrichedEntry::from_activity(&entry);

        assert_eq!(enriched.author, "alice");
        assert_eq!(enriched.activity_type, ActivityType::VideoRated);
        assert_eq!(enriched.video_id.as_deref(), Some("abc123"));
        assert_eq!(enriched.rating, Some(4));
        assert!(enriched.video_info.is_none());
        assert!(enriched.username.is_none());
    }

    #[test]
    fn feed_serializes_as_array() {
        let feed = EnrichedFeed(vec![uploaded("a"), uploaded("b")]);
        let json = serde_json::to_value(&feed).unwrap();
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[0]["video_id"], "a");
        assert_eq!(json[1]["video_id"], "b");
    }

    #[test]
    fn feed_round_trip() {
        let mut entry = uploaded("abc123");
        entry.video_info = Some(Enrichment::unavailable());
        let feed = EnrichedFeed(vec![entry, uploaded("def456")]);

        let json = serde_json::to_string(&feed).unwrap();
        let back: EnrichedFeed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, feed);
    }

    #[test]
    fn empty_feed() {
        let feed = EnrichedFeed::new();
        assert!(feed.is_empty());
        assert_eq!(feed.len(), 0);
        assert_eq!(serde_json::to_string(&feed).unwrap(), "[]");
    }
}
