use super::domain::{
    CategoryRating, Review, DEFAULT_GUEST_NAME, DEFAULT_LISTING_NAME, DEFAULT_TAG,
    GUEST_REVIEW_TYPE, RATING_SCALE_MAX,
};
use serde_json::Value;
use std::collections::HashMap;

/// Convert one raw review record into the canonical shape, merging in the
/// public-display approval for its id.
///
/// Malformed input never aborts normalization: every field degrades
/// independently to its documented default.
pub fn normalize_review(raw: &Value, approvals: &HashMap<i64, bool>) -> Review {
    let id = raw.get("id").and_then(Value::as_i64);
    let review_category = normalize_categories(raw.get("reviewCategory"));
    let rating = derive_rating(&review_category, raw.get("rating"));

    Review {
        id,
        review_type: string_or(raw.get("type"), DEFAULT_TAG),
        status: string_or(raw.get("status"), DEFAULT_TAG),
        rating,
        public_review: string_or(raw.get("publicReview"), ""),
        review_category,
        submitted_at: string_or(raw.get("submittedAt"), ""),
        guest_name: string_or(raw.get("guestName"), DEFAULT_GUEST_NAME),
        listing_name: string_or(raw.get("listingName"), DEFAULT_LISTING_NAME),
        display_on_website: id
            .map(|id| approvals.get(&id).copied().unwrap_or(false))
            .unwrap_or(false),
    }
}

/// Normalize a raw batch, keeping only guest-authored records.
pub fn normalize_guest_reviews(raw: &[Value], approvals: &HashMap<i64, bool>) -> Vec<Review> {
    raw.iter()
        .filter(|record| is_guest_review(record))
        .map(|record| normalize_review(record, approvals))
        .collect()
}

pub fn is_guest_review(raw: &Value) -> bool {
    raw.get("type").and_then(Value::as_str) == Some(GUEST_REVIEW_TYPE)
}

fn string_or(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

/// Coerce the raw category list, dropping entries without a string category
/// name or a numeric rating. Ratings are clamped onto the 0..=10 scale.
fn normalize_categories(value: Option<&Value>) -> Vec<CategoryRating> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let category = entry.get("category")?.as_str()?;
            let rating = entry.get("rating")?.as_f64()?;
            Some(CategoryRating {
                category: category.to_string(),
                rating: rating.clamp(0.0, RATING_SCALE_MAX),
            })
        })
        .collect()
}

/// The overall rating is the mean of the category ratings rounded to two
/// decimals; a record with no usable categories falls back to its own numeric
/// overall rating, and to null when neither exists.
fn derive_rating(categories: &[CategoryRating], overall: Option<&Value>) -> Option<f64> {
    if !categories.is_empty() {
        let sum: f64 = categories.iter().map(|entry| entry.rating).sum();
        return Some(round_to_two(sum / categories.len() as f64));
    }

    overall
        .and_then(Value::as_f64)
        .map(|value| value.clamp(0.0, RATING_SCALE_MAX))
}

pub(crate) fn round_to_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
