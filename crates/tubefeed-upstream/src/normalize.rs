//! Normalization of raw activity data into domain types.
//!
//! Raw items with an activity type this version does not know about are
//! dropped here with a warning; items missing the id their type calls
//! for are kept (enrichment surfaces the unavailable sentinel for them).

use tracing::warn;

use tubefeed_core::{ActivityEntry, ActivityType};

use crate::raw_feed::RawActivity;

/// Converts one raw activity into a typed entry.
///
/// Returns `None` when the activity type is unknown.
pub fn normalize_activity(raw: RawActivity) -> Option<ActivityEntry> {
    let Some(activity_type) = ActivityType::from_api_str(&raw.activity_type) else {
        warn!(
            activity_type = %raw.activity_type,
            author = %raw.author,
            "dropping activity with unknown type"
        );
        return None;
    };

    // The rating value only means something on rating entries.
    let rating = match activity_type {
        ActivityType::VideoRated => raw.rating,
        _ => None,
    };

    Some(ActivityEntry {
        author: raw.author,
        activity_type,
        updated: raw.updated,
        video_id: raw.video_id,
        username: raw.username,
        rating,
    })
}

/// Converts a batch of raw activities, preserving order.
pub fn normalize_activities(raws: Vec<RawActivity>) -> Vec<ActivityEntry> {
    raws.into_iter().filter_map(normalize_activity).collect()
}
