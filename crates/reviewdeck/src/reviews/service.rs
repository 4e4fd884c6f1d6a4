use super::analytics::{analyze, DashboardAnalytics};
use super::approvals::{ApprovalStore, ApprovalStoreError};
use super::domain::Review;
use super::filter::{apply_filter, ReviewFilter, ALL_SENTINEL};
use super::fixtures;
use super::normalizer::normalize_guest_reviews;
use super::sort::{sort_reviews, SortKey};
use super::source::ReviewSource;
use std::sync::Arc;
use tracing::{info, warn};

/// Facade composing the upstream source, the approval store, and the
/// normalization/filter/sort/analytics pipeline.
///
/// Every call recomputes from a fresh snapshot; nothing is mutated in place,
/// so the pipeline stays pure and reentrant.
pub struct ReviewDashboardService<S, A> {
    source: Arc<S>,
    approvals: Arc<A>,
}

impl<S, A> ReviewDashboardService<S, A>
where
    S: ReviewSource + 'static,
    A: ApprovalStore + 'static,
{
    pub fn new(source: Arc<S>, approvals: Arc<A>) -> Self {
        Self { source, approvals }
    }

    /// Fetch, normalize, and approval-merge the current review collection.
    ///
    /// Source failure or an empty result falls back to the bundled fixture
    /// dataset and is never surfaced as a caller-facing error.
    pub async fn load_reviews(&self) -> Result<Vec<Review>, ReviewServiceError> {
        let raw = match self.source.fetch_raw().await {
            Ok(records) if records.is_empty() => {
                info!("review source returned no records, serving fixture dataset");
                fixtures::raw_reviews().to_vec()
            }
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "review source unavailable, serving fixture dataset");
                fixtures::raw_reviews().to_vec()
            }
        };

        let approvals = self.approvals.get()?;
        Ok(normalize_guest_reviews(&raw, &approvals))
    }

    /// Management view: filtered then sorted snapshot.
    pub async fn query(
        &self,
        filter: &ReviewFilter,
        sort: &SortKey,
    ) -> Result<Vec<Review>, ReviewServiceError> {
        let reviews = self.load_reviews().await?;
        Ok(sort_reviews(apply_filter(&reviews, filter), sort))
    }

    /// Dashboard view: aggregate statistics, optionally scoped to one
    /// property. `None` means the scoped collection held no reviews.
    pub async fn analytics(
        &self,
        property: Option<&str>,
    ) -> Result<Option<DashboardAnalytics>, ReviewServiceError> {
        let reviews = self.load_reviews().await?;
        let scoped: Vec<Review> = match property {
            Some(name) if name != ALL_SENTINEL => reviews
                .into_iter()
                .filter(|review| review.listing_name == name)
                .collect(),
            _ => reviews,
        };
        Ok(analyze(&scoped))
    }

    /// Public property page: approved reviews for one listing, newest first.
    pub async fn public_reviews(&self, listing: &str) -> Result<Vec<Review>, ReviewServiceError> {
        let reviews = self.load_reviews().await?;
        let approved = reviews
            .into_iter()
            .filter(|review| review.display_on_website && review.listing_name == listing)
            .collect();
        Ok(sort_reviews(approved, &SortKey::default()))
    }

    /// Persist an approval toggle. Nothing is patched locally: the new state
    /// becomes visible on the next load, after the store confirmed the write.
    pub fn set_approval(&self, review_id: i64, display: bool) -> Result<(), ReviewServiceError> {
        self.approvals.set(review_id, display)?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error(transparent)]
    Approvals(#[from] ApprovalStoreError),
}
