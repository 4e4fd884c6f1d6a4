use super::domain::Review;
use std::collections::BTreeSet;

/// Discover the distinct category vocabulary across a review collection.
///
/// The result is sorted lexicographically so filter controls, sort-key lists,
/// and chart axes stay stable across refetches regardless of input order.
pub fn detect_categories(reviews: &[Review]) -> Vec<String> {
    let mut vocabulary = BTreeSet::new();
    for review in reviews {
        for entry in &review.review_category {
            if !vocabulary.contains(entry.category.as_str()) {
                vocabulary.insert(entry.category.clone());
            }
        }
    }
    vocabulary.into_iter().collect()
}

/// Display form of a category key: underscores become spaces and each word is
/// capitalized, so `respect_house_rules` renders as `Respect House Rules`.
pub fn humanize_category(category: &str) -> String {
    category
        .split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
