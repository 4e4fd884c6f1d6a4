use super::domain::{Review, KNOWN_CHANNEL, RATING_SCALE_MAX};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel accepted from UI controls to mean "no restriction".
pub const ALL_SENTINEL: &str = "all";

/// Inclusive rating bound on the 0..=10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingRange {
    pub min: f64,
    pub max: f64,
}

impl RatingRange {
    pub const FULL: RatingRange = RatingRange {
        min: 0.0,
        max: RATING_SCALE_MAX,
    };

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// A bound spanning the whole scale restricts nothing.
    pub fn is_unbounded(&self) -> bool {
        self.min <= 0.0 && self.max >= RATING_SCALE_MAX
    }
}

impl Default for RatingRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Public-display facet of the management view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    #[default]
    All,
    Shown,
    Hidden,
}

/// Compound filter specification for the management view.
///
/// All facets compose by logical AND and none has a side effect, so the order
/// of application never changes the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewFilter {
    pub property: Option<String>,
    pub channel: Option<String>,
    pub display_status: DisplayStatus,
    pub search_text: String,
    pub category_ranges: BTreeMap<String, RatingRange>,
}

impl ReviewFilter {
    pub fn matches(&self, review: &Review) -> bool {
        self.matches_property(review)
            && self.matches_channel()
            && self.matches_display(review)
            && self.matches_search(review)
            && self.matches_category_ranges(review)
    }

    fn matches_property(&self, review: &Review) -> bool {
        match self.property.as_deref() {
            None => true,
            Some(ALL_SENTINEL) => true,
            Some(name) => review.listing_name == name,
        }
    }

    // Every review comes through the one known channel, so any other value
    // excludes the whole collection.
    fn matches_channel(&self) -> bool {
        match self.channel.as_deref() {
            None => true,
            Some(ALL_SENTINEL) => true,
            Some(channel) => channel == KNOWN_CHANNEL,
        }
    }

    fn matches_display(&self, review: &Review) -> bool {
        match self.display_status {
            DisplayStatus::All => true,
            DisplayStatus::Shown => review.display_on_website,
            DisplayStatus::Hidden => !review.display_on_website,
        }
    }

    fn matches_search(&self, review: &Review) -> bool {
        let query = self.search_text.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        review.public_review.to_lowercase().contains(&query)
            || review.guest_name.to_lowercase().contains(&query)
            || review.listing_name.to_lowercase().contains(&query)
    }

    // Missing data is never penalized: a review without categories, or without
    // the bounded category, passes regardless of the bound.
    fn matches_category_ranges(&self, review: &Review) -> bool {
        for (category, range) in &self.category_ranges {
            if range.is_unbounded() {
                continue;
            }
            if review.review_category.is_empty() {
                continue;
            }
            match review.category_rating(category) {
                None => continue,
                Some(value) => {
                    if !range.contains(value) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// Apply a filter over the collection, preserving relative order.
pub fn apply_filter(reviews: &[Review], filter: &ReviewFilter) -> Vec<Review> {
    reviews
        .iter()
        .filter(|review| filter.matches(review))
        .cloned()
        .collect()
}

/// Initial per-category bounds: every detected category starts unrestricted.
pub fn default_category_ranges(categories: &[String]) -> BTreeMap<String, RatingRange> {
    categories
        .iter()
        .map(|category| (category.clone(), RatingRange::FULL))
        .collect()
}
