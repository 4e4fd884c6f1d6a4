use super::categories::{detect_categories, humanize_category};
use super::domain::Review;
use super::normalizer::round_to_two;
use serde::Serialize;
use std::collections::BTreeMap;

/// Threshold at or below which a category score counts as a low rating in the
/// per-property rollup.
const LOW_RATING_THRESHOLD: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAverage {
    pub category: String,
    pub label: String,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingBucket {
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRollup {
    pub listing_name: String,
    pub total_reviews: usize,
    pub average_rating: f64,
    pub low_ratings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAverage {
    /// Sortable `YYYY-MM` bucket key.
    pub month: String,
    /// Display form, e.g. `Aug 2024`.
    pub label: String,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAnalytics {
    pub total_reviews: usize,
    pub overall_average: f64,
    pub unique_properties_count: usize,
    pub category_chart_data: Vec<CategoryAverage>,
    pub rating_pie_data: Vec<RatingBucket>,
    pub properties_by_rating: Vec<PropertyRollup>,
    pub rating_over_time_data: Vec<MonthlyAverage>,
}

/// Compute dashboard statistics over a review collection.
///
/// Returns `None` for an empty collection so the consumer can render an empty
/// state distinctly from an all-zero dataset.
pub fn analyze(reviews: &[Review]) -> Option<DashboardAnalytics> {
    if reviews.is_empty() {
        return None;
    }

    Some(DashboardAnalytics {
        total_reviews: reviews.len(),
        overall_average: overall_average(reviews),
        unique_properties_count: unique_properties(reviews),
        category_chart_data: category_chart_data(reviews),
        rating_pie_data: rating_pie_data(reviews),
        properties_by_rating: properties_by_rating(reviews),
        rating_over_time_data: rating_over_time(reviews),
    })
}

fn overall_average(reviews: &[Review]) -> f64 {
    mean(reviews.iter().filter_map(|review| review.rating))
}

fn unique_properties(reviews: &[Review]) -> usize {
    reviews
        .iter()
        .map(|review| review.listing_name.as_str())
        .collect::<std::collections::BTreeSet<_>>()
        .len()
}

fn category_chart_data(reviews: &[Review]) -> Vec<CategoryAverage> {
    detect_categories(reviews)
        .into_iter()
        .map(|category| {
            let average = mean(
                reviews
                    .iter()
                    .filter_map(|review| review.category_rating(&category)),
            );
            CategoryAverage {
                label: humanize_category(&category),
                category,
                average,
            }
        })
        .collect()
}

// Fixed buckets over the overall rating. Ratings below 1 (or null) fall
// outside every bucket, and empty buckets are omitted.
fn rating_pie_data(reviews: &[Review]) -> Vec<RatingBucket> {
    const BUCKETS: [&str; 4] = ["Excellent", "Good", "Average", "Poor"];

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for review in reviews {
        if let Some(label) = review.rating.and_then(bucket_label) {
            *counts.entry(label).or_insert(0) += 1;
        }
    }

    BUCKETS
        .into_iter()
        .filter_map(|label| {
            let count = counts.get(label).copied().unwrap_or(0);
            (count > 0).then_some(RatingBucket { label, count })
        })
        .collect()
}

fn bucket_label(rating: f64) -> Option<&'static str> {
    if !(1.0..=10.0).contains(&rating) {
        return None;
    }
    if rating >= 9.0 {
        Some("Excellent")
    } else if rating >= 7.0 {
        Some("Good")
    } else if rating >= 5.0 {
        Some("Average")
    } else {
        Some("Poor")
    }
}

fn properties_by_rating(reviews: &[Review]) -> Vec<PropertyRollup> {
    let mut grouped: BTreeMap<&str, Vec<&Review>> = BTreeMap::new();
    for review in reviews {
        grouped
            .entry(review.listing_name.as_str())
            .or_default()
            .push(review);
    }

    let mut rollups: Vec<PropertyRollup> = grouped
        .into_iter()
        .map(|(listing_name, reviews)| {
            let average_rating = mean(reviews.iter().filter_map(|review| review.rating));
            let low_ratings = reviews
                .iter()
                .flat_map(|review| &review.review_category)
                .filter(|entry| entry.rating <= LOW_RATING_THRESHOLD)
                .count();
            PropertyRollup {
                listing_name: listing_name.to_string(),
                total_reviews: reviews.len(),
                average_rating,
                low_ratings,
            }
        })
        .collect();

    rollups.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating));
    rollups
}

// Calendar-month buckets over reviews that carry both a parseable submission
// stamp and a rating; months are naturally ascending via the BTreeMap key.
fn rating_over_time(reviews: &[Review]) -> Vec<MonthlyAverage> {
    let mut buckets: BTreeMap<String, (String, Vec<f64>)> = BTreeMap::new();
    for review in reviews {
        let (Some(timestamp), Some(rating)) = (review.submitted_timestamp(), review.rating) else {
            continue;
        };
        let key = timestamp.format("%Y-%m").to_string();
        let label = timestamp.format("%b %Y").to_string();
        buckets.entry(key).or_insert_with(|| (label, Vec::new())).1.push(rating);
    }

    buckets
        .into_iter()
        .map(|(month, (label, ratings))| MonthlyAverage {
            month,
            label,
            average: mean(ratings.iter().copied()),
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        round_to_two(sum / count as f64)
    }
}
