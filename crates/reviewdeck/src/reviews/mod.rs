pub mod analytics;
pub mod approvals;
pub mod categories;
pub mod domain;
pub mod filter;
pub mod fixtures;
pub mod hostaway;
pub mod normalizer;
pub mod router;
pub mod service;
pub mod sort;
pub mod source;

pub use analytics::{analyze, DashboardAnalytics};
pub use approvals::{ApprovalStore, ApprovalStoreError, FileApprovalStore};
pub use categories::detect_categories;
pub use domain::{CategoryRating, Review};
pub use filter::{apply_filter, DisplayStatus, RatingRange, ReviewFilter};
pub use hostaway::{AccessToken, HostawayClient};
pub use normalizer::{normalize_guest_reviews, normalize_review};
pub use router::review_router;
pub use service::{ReviewDashboardService, ReviewServiceError};
pub use sort::{sort_reviews, SortDirection, SortField, SortKey};
pub use source::{ReviewSource, SourceError};
