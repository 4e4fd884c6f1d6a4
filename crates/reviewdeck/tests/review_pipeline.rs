//! End-to-end specifications for the review pipeline: raw records in, the
//! normalized collection through filtering, sorting, and analytics out.
//!
//! Scenarios run through the public service facade with an in-memory source
//! and approval store so the whole path is exercised without touching the
//! network or the filesystem.

mod common {
    use async_trait::async_trait;
    use reviewdeck::reviews::{ApprovalStore, ApprovalStoreError, ReviewSource, SourceError};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    pub(super) struct StaticSource {
        pub(super) records: Vec<Value>,
    }

    #[async_trait]
    impl ReviewSource for StaticSource {
        async fn fetch_raw(&self) -> Result<Vec<Value>, SourceError> {
            Ok(self.records.clone())
        }
    }

    #[derive(Default)]
    pub(super) struct MemoryApprovals {
        map: Mutex<HashMap<i64, bool>>,
    }

    impl ApprovalStore for MemoryApprovals {
        fn get(&self) -> Result<HashMap<i64, bool>, ApprovalStoreError> {
            Ok(self.map.lock().expect("approvals mutex poisoned").clone())
        }

        fn set(&self, review_id: i64, display: bool) -> Result<(), ApprovalStoreError> {
            self.map
                .lock()
                .expect("approvals mutex poisoned")
                .insert(review_id, display);
            Ok(())
        }
    }

    pub(super) fn guest_record(
        id: i64,
        listing: &str,
        guest: &str,
        submitted_at: &str,
        categories: &[(&str, f64)],
    ) -> Value {
        let entries: Vec<Value> = categories
            .iter()
            .map(|(category, rating)| json!({ "category": category, "rating": rating }))
            .collect();
        json!({
            "id": id,
            "type": "guest-to-host",
            "status": "published",
            "publicReview": format!("Stay feedback from {guest}"),
            "reviewCategory": entries,
            "submittedAt": submitted_at,
            "guestName": guest,
            "listingName": listing,
        })
    }
}

use common::{guest_record, MemoryApprovals, StaticSource};
use reviewdeck::reviews::{
    analyze, apply_filter, detect_categories, normalize_review, sort_reviews, DisplayStatus,
    RatingRange, Review, ReviewDashboardService, ReviewFilter, SortDirection, SortField, SortKey,
};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

fn service_over(
    records: Vec<serde_json::Value>,
) -> ReviewDashboardService<StaticSource, MemoryApprovals> {
    ReviewDashboardService::new(
        Arc::new(StaticSource { records }),
        Arc::new(MemoryApprovals::default()),
    )
}

#[test]
fn normalizer_handles_records_with_every_optional_field_missing() {
    let raw_records = [
        json!({}),
        json!({ "id": 5 }),
        json!({ "reviewCategory": "garbage" }),
        json!({ "rating": 25 }),
    ];

    for raw in &raw_records {
        let review: Review = normalize_review(raw, &HashMap::new());
        if let Some(rating) = review.rating {
            assert!((0.0..=10.0).contains(&rating));
        }
        for entry in &review.review_category {
            assert!((0.0..=10.0).contains(&entry.rating));
        }
        assert!(!review.guest_name.is_empty());
        assert!(!review.listing_name.is_empty());
        assert!(!review.display_on_website);
    }
}

#[test]
fn rating_derivation_matches_the_category_mean() {
    let raw = json!({
        "id": 1,
        "type": "guest-to-host",
        "reviewCategory": [
            { "category": "cleanliness", "rating": 8 },
            { "category": "communication", "rating": 10 }
        ]
    });

    let review = normalize_review(&raw, &HashMap::new());
    assert_eq!(review.rating, Some(9.0));
}

#[tokio::test]
async fn detector_returns_the_sorted_union_of_categories() {
    let service = service_over(vec![
        guest_record(
            1,
            "A",
            "Maria",
            "2024-05-01 10:00:00",
            &[("cleanliness", 9.0), ("communication", 8.0)],
        ),
        guest_record(2, "A", "Tom", "2024-05-02 10:00:00", &[("cleanliness", 7.0)]),
    ]);

    let reviews = service.load_reviews().await.expect("load succeeds");
    assert_eq!(
        detect_categories(&reviews),
        vec!["cleanliness".to_string(), "communication".to_string()]
    );
}

#[tokio::test]
async fn category_range_excludes_low_scores_but_passes_missing_data() {
    let service = service_over(vec![
        guest_record(1, "A", "Nine", "2024-05-01 10:00:00", &[("cleanliness", 9.0)]),
        guest_record(2, "A", "Seven", "2024-05-02 10:00:00", &[("cleanliness", 7.0)]),
        guest_record(3, "A", "NoCategory", "2024-05-03 10:00:00", &[]),
    ]);

    let mut ranges = BTreeMap::new();
    ranges.insert(
        "cleanliness".to_string(),
        RatingRange {
            min: 8.0,
            max: 10.0,
        },
    );
    let filter = ReviewFilter {
        category_ranges: ranges,
        ..ReviewFilter::default()
    };

    let kept = service
        .query(&filter, &SortKey::default())
        .await
        .expect("query succeeds");
    let guests: Vec<&str> = kept.iter().map(|review| review.guest_name.as_str()).collect();

    assert!(guests.contains(&"Nine"));
    assert!(guests.contains(&"NoCategory"));
    assert!(!guests.contains(&"Seven"));
}

#[tokio::test]
async fn missing_category_sorts_last_in_either_direction() {
    let records = vec![
        guest_record(1, "A", "WithScore", "2024-05-01 10:00:00", &[("cleanliness", 6.0)]),
        guest_record(2, "A", "NoScore", "2024-05-02 10:00:00", &[("location", 9.0)]),
        guest_record(3, "A", "TopScore", "2024-05-03 10:00:00", &[("cleanliness", 10.0)]),
    ];

    for direction in [SortDirection::Asc, SortDirection::Desc] {
        let service = service_over(records.clone());
        let reviews = service
            .query(
                &ReviewFilter::default(),
                &SortKey {
                    field: SortField::Category {
                        name: "cleanliness".to_string(),
                    },
                    direction,
                },
            )
            .await
            .expect("query succeeds");

        assert_eq!(
            reviews.last().map(|review| review.guest_name.as_str()),
            Some("NoScore"),
            "review without the category must stay last for {direction:?}"
        );
    }
}

#[tokio::test]
async fn filtering_twice_equals_filtering_once() {
    let service = service_over(vec![
        guest_record(1, "A", "Maria", "2024-05-01 10:00:00", &[("cleanliness", 9.0)]),
        guest_record(2, "B", "Tom", "2024-05-02 10:00:00", &[("cleanliness", 5.0)]),
        guest_record(3, "A", "Priya", "2024-05-03 10:00:00", &[]),
    ]);
    let reviews = service.load_reviews().await.expect("load succeeds");

    let mut ranges = BTreeMap::new();
    ranges.insert(
        "cleanliness".to_string(),
        RatingRange {
            min: 6.0,
            max: 10.0,
        },
    );
    let filter = ReviewFilter {
        property: Some("A".to_string()),
        display_status: DisplayStatus::Hidden,
        category_ranges: ranges,
        ..ReviewFilter::default()
    };

    let once = apply_filter(&reviews, &filter);
    let twice = apply_filter(&once, &filter);
    assert_eq!(once, twice);
}

#[tokio::test]
async fn pie_buckets_partition_the_scale_as_published() {
    let records: Vec<serde_json::Value> = [9.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]
        .into_iter()
        .enumerate()
        .map(|(index, rating)| {
            json!({
                "id": index as i64 + 1,
                "type": "guest-to-host",
                "status": "published",
                "rating": rating,
                "submittedAt": "2024-05-01 10:00:00",
                "guestName": "Guest",
                "listingName": "A",
            })
        })
        .collect();

    let service = service_over(records);
    let analytics = service
        .analytics(None)
        .await
        .expect("analytics succeeds")
        .expect("collection is non-empty");

    let counts: Vec<(&str, usize)> = analytics
        .rating_pie_data
        .iter()
        .map(|bucket| (bucket.label, bucket.count))
        .collect();
    assert_eq!(
        counts,
        vec![("Excellent", 2), ("Good", 2), ("Average", 2), ("Poor", 4)]
    );
    assert_eq!(counts.iter().map(|(_, count)| count).sum::<usize>(), 10);
}

#[test]
fn empty_collection_yields_empty_everything() {
    assert!(analyze(&[]).is_none());
    assert!(apply_filter(&[], &ReviewFilter::default()).is_empty());
    assert!(sort_reviews(Vec::new(), &SortKey::default()).is_empty());
}

#[tokio::test]
async fn property_rollups_rank_by_exact_average() {
    let service = service_over(vec![
        guest_record(1, "Property A", "G1", "2024-05-01 10:00:00", &[("cleanliness", 9.0)]),
        guest_record(2, "Property A", "G2", "2024-05-02 10:00:00", &[("cleanliness", 10.0)]),
        guest_record(3, "Property B", "G3", "2024-05-03 10:00:00", &[("cleanliness", 3.0)]),
        guest_record(4, "Property B", "G4", "2024-05-04 10:00:00", &[("cleanliness", 4.0)]),
    ]);

    let analytics = service
        .analytics(None)
        .await
        .expect("analytics succeeds")
        .expect("collection is non-empty");

    let rollups = &analytics.properties_by_rating;
    assert_eq!(rollups.len(), 2);
    assert_eq!(rollups[0].listing_name, "Property A");
    assert_eq!(rollups[0].average_rating, 9.5);
    assert_eq!(rollups[1].listing_name, "Property B");
    assert_eq!(rollups[1].average_rating, 3.5);
    // Both of B's category scores sit at or below the low-rating threshold.
    assert_eq!(rollups[1].low_ratings, 2);
}

#[tokio::test]
async fn approval_toggle_round_trips_through_the_public_page() {
    let service = service_over(vec![
        guest_record(1, "Property A", "Maria", "2024-05-01 10:00:00", &[("cleanliness", 9.0)]),
        guest_record(2, "Property A", "Tom", "2024-05-02 10:00:00", &[("cleanliness", 8.0)]),
    ]);

    assert!(service
        .public_reviews("Property A")
        .await
        .expect("page loads")
        .is_empty());

    service.set_approval(2, true).expect("toggle persists");

    let page = service
        .public_reviews("Property A")
        .await
        .expect("page loads");
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].guest_name, "Tom");
    assert!(page[0].display_on_website);
}
