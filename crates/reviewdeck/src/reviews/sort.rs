use super::domain::Review;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// What to order by. Category keys are carried as data rather than encoded
/// into a delimited string, so a category name containing a separator can
/// never be misparsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SortField {
    Date,
    Rating,
    Category { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortKey {
    /// The management view opens on newest-first.
    fn default() -> Self {
        Self {
            field: SortField::Date,
            direction: SortDirection::Desc,
        }
    }
}

/// Return a new ordering of the collection. The sort is stable, so reviews
/// that compare equal keep their relative order.
pub fn sort_reviews(mut reviews: Vec<Review>, key: &SortKey) -> Vec<Review> {
    match &key.field {
        // Unparseable submission stamps compare as the Unix epoch, which
        // sorts them to the oldest extreme.
        SortField::Date => {
            reviews.sort_by(|a, b| {
                let left = submitted_epoch_seconds(a);
                let right = submitted_epoch_seconds(b);
                key.direction.apply(left.cmp(&right))
            });
        }
        SortField::Rating => {
            reviews.sort_by(|a, b| {
                let left = a.rating.unwrap_or(0.0);
                let right = b.rating.unwrap_or(0.0);
                key.direction.apply(left.total_cmp(&right))
            });
        }
        // Reviews missing the category sort to the end in both directions;
        // two reviews both missing it compare equal.
        SortField::Category { name } => {
            reviews.sort_by(|a, b| {
                match (a.category_rating(name), b.category_rating(name)) {
                    (Some(left), Some(right)) => key.direction.apply(left.total_cmp(&right)),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            });
        }
    }
    reviews
}

fn submitted_epoch_seconds(review: &Review) -> i64 {
    review
        .submitted_timestamp()
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviews::domain::CategoryRating;

    fn review(guest: &str, submitted_at: &str, rating: Option<f64>) -> Review {
        Review {
            id: None,
            review_type: "guest-to-host".to_string(),
            status: "published".to_string(),
            rating,
            public_review: String::new(),
            review_category: Vec::new(),
            submitted_at: submitted_at.to_string(),
            guest_name: guest.to_string(),
            listing_name: "Listing".to_string(),
            display_on_website: false,
        }
    }

    fn with_category(mut review: Review, category: &str, rating: f64) -> Review {
        review.review_category.push(CategoryRating {
            category: category.to_string(),
            rating,
        });
        review
    }

    fn guests(reviews: &[Review]) -> Vec<&str> {
        reviews
            .iter()
            .map(|review| review.guest_name.as_str())
            .collect()
    }

    #[test]
    fn date_desc_puts_newest_first() {
        let reviews = vec![
            review("old", "2023-01-10 08:00:00", None),
            review("new", "2024-06-01 08:00:00", None),
        ];

        let sorted = sort_reviews(reviews, &SortKey::default());
        assert_eq!(guests(&sorted), vec!["new", "old"]);
    }

    #[test]
    fn unparseable_dates_compare_as_the_epoch() {
        let reviews = vec![
            review("valid", "2024-06-01 08:00:00", None),
            review("garbage", "soon-ish", None),
        ];

        let desc = sort_reviews(reviews.clone(), &SortKey::default());
        assert_eq!(guests(&desc), vec!["valid", "garbage"]);

        let asc = sort_reviews(
            reviews,
            &SortKey {
                field: SortField::Date,
                direction: SortDirection::Asc,
            },
        );
        assert_eq!(guests(&asc), vec!["garbage", "valid"]);
    }

    #[test]
    fn rating_sort_treats_null_as_zero() {
        let reviews = vec![
            review("rated", "", Some(6.5)),
            review("unrated", "", None),
            review("top", "", Some(9.8)),
        ];

        let sorted = sort_reviews(
            reviews,
            &SortKey {
                field: SortField::Rating,
                direction: SortDirection::Desc,
            },
        );
        assert_eq!(guests(&sorted), vec!["top", "rated", "unrated"]);
    }

    #[test]
    fn category_sort_orders_by_that_category() {
        let reviews = vec![
            with_category(review("low", "", None), "cleanliness", 6.0),
            with_category(review("high", "", None), "cleanliness", 9.5),
        ];

        let sorted = sort_reviews(
            reviews,
            &SortKey {
                field: SortField::Category {
                    name: "cleanliness".to_string(),
                },
                direction: SortDirection::Desc,
            },
        );
        assert_eq!(guests(&sorted), vec!["high", "low"]);
    }

    #[test]
    fn missing_category_sorts_last_in_both_directions() {
        let build = || {
            vec![
                review("missing", "", Some(9.9)),
                with_category(review("low", "", None), "cleanliness", 4.0),
                with_category(review("high", "", None), "cleanliness", 9.0),
            ]
        };

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let sorted = sort_reviews(
                build(),
                &SortKey {
                    field: SortField::Category {
                        name: "cleanliness".to_string(),
                    },
                    direction,
                },
            );
            assert_eq!(
                sorted.last().map(|review| review.guest_name.as_str()),
                Some("missing"),
                "missing category must sort last for {direction:?}"
            );
        }
    }

    #[test]
    fn reviews_both_missing_the_category_keep_relative_order() {
        let reviews = vec![
            review("first", "", None),
            review("second", "", None),
            with_category(review("scored", "", None), "cleanliness", 8.0),
        ];

        let sorted = sort_reviews(
            reviews,
            &SortKey {
                field: SortField::Category {
                    name: "cleanliness".to_string(),
                },
                direction: SortDirection::Asc,
            },
        );
        assert_eq!(guests(&sorted), vec!["scored", "first", "second"]);
    }

    #[test]
    fn empty_collection_sorts_to_empty() {
        assert!(sort_reviews(Vec::new(), &SortKey::default()).is_empty());
    }
}
