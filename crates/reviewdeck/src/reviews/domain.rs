use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Source tag identifying guest-authored feedback; host-authored records never
/// enter the pipeline.
pub const GUEST_REVIEW_TYPE: &str = "guest-to-host";

/// The only booking channel currently wired up.
pub const KNOWN_CHANNEL: &str = "hostaway";

/// Upper bound of the rating scale. All overall and per-category ratings live
/// on 0..=10.
pub const RATING_SCALE_MAX: f64 = 10.0;

pub const DEFAULT_GUEST_NAME: &str = "Unknown Guest";
pub const DEFAULT_LISTING_NAME: &str = "Unknown Property";
pub const DEFAULT_TAG: &str = "unknown";

/// A named sub-score attached to a review, e.g. cleanliness or communication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRating {
    pub category: String,
    pub rating: f64,
}

/// Canonical guest feedback record.
///
/// The serialized field names are wire-visible and consumed by both the
/// management dashboard and the public property page, so they must stay
/// backward compatible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub review_type: String,
    pub status: String,
    pub rating: Option<f64>,
    pub public_review: String,
    pub review_category: Vec<CategoryRating>,
    pub submitted_at: String,
    pub guest_name: String,
    pub listing_name: String,
    pub display_on_website: bool,
}

impl Review {
    /// Rating for a named category, taking the first entry when the source
    /// carried duplicates.
    pub fn category_rating(&self, category: &str) -> Option<f64> {
        self.review_category
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.rating)
    }

    /// Parsed submission time, or `None` when the raw string is blank or in a
    /// format the upstream has never been observed to emit.
    pub fn submitted_timestamp(&self) -> Option<NaiveDateTime> {
        parse_submitted_at(&self.submitted_at)
    }
}

/// Parse the loosely ISO-8601 submission stamp the booking API emits.
///
/// Accepts RFC 3339, the API's `YYYY-MM-DD HH:MM:SS` form, and a bare date.
pub(crate) fn parse_submitted_at(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}
