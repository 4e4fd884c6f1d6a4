use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::approvals::ApprovalStore;
use super::filter::ReviewFilter;
use super::service::{ReviewDashboardService, ReviewServiceError};
use super::sort::SortKey;
use super::source::ReviewSource;

/// Router builder exposing the review pipeline over HTTP.
pub fn review_router<S, A>(service: Arc<ReviewDashboardService<S, A>>) -> Router
where
    S: ReviewSource + 'static,
    A: ApprovalStore + 'static,
{
    Router::new()
        .route("/api/v1/reviews/hostaway", get(hostaway_reviews_handler::<S, A>))
        .route("/api/v1/reviews/query", post(query_handler::<S, A>))
        .route(
            "/api/v1/reviews/:review_id/approval",
            patch(approval_handler::<S, A>),
        )
        .route("/api/v1/analytics", get(analytics_handler::<S, A>))
        .route(
            "/api/v1/properties/:listing_name/reviews",
            get(public_reviews_handler::<S, A>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ReviewQueryRequest {
    pub(crate) filter: ReviewFilter,
    pub(crate) sort: SortKey,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApprovalUpdateRequest {
    pub(crate) display: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AnalyticsParams {
    pub(crate) property: Option<String>,
}

pub(crate) async fn hostaway_reviews_handler<S, A>(
    State(service): State<Arc<ReviewDashboardService<S, A>>>,
) -> Response
where
    S: ReviewSource + 'static,
    A: ApprovalStore + 'static,
{
    match service.load_reviews().await {
        Ok(reviews) => {
            let payload = json!({
                "status": "success",
                "total": reviews.len(),
                "result": reviews,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn query_handler<S, A>(
    State(service): State<Arc<ReviewDashboardService<S, A>>>,
    axum::Json(request): axum::Json<ReviewQueryRequest>,
) -> Response
where
    S: ReviewSource + 'static,
    A: ApprovalStore + 'static,
{
    match service.query(&request.filter, &request.sort).await {
        Ok(reviews) => {
            let payload = json!({
                "status": "success",
                "total": reviews.len(),
                "result": reviews,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn approval_handler<S, A>(
    State(service): State<Arc<ReviewDashboardService<S, A>>>,
    Path(review_id): Path<i64>,
    axum::Json(request): axum::Json<ApprovalUpdateRequest>,
) -> Response
where
    S: ReviewSource + 'static,
    A: ApprovalStore + 'static,
{
    match service.set_approval(review_id, request.display) {
        Ok(()) => {
            let payload = json!({
                "status": "success",
                "id": review_id,
                "displayOnWebsite": request.display,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        // The store is external; a failed write is transient and the local
        // state stays untouched.
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn analytics_handler<S, A>(
    State(service): State<Arc<ReviewDashboardService<S, A>>>,
    Query(params): Query<AnalyticsParams>,
) -> Response
where
    S: ReviewSource + 'static,
    A: ApprovalStore + 'static,
{
    match service.analytics(params.property.as_deref()).await {
        Ok(Some(analytics)) => {
            let payload = json!({
                "status": "success",
                "analytics": analytics,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(None) => {
            let payload = json!({ "status": "no_data" });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn public_reviews_handler<S, A>(
    State(service): State<Arc<ReviewDashboardService<S, A>>>,
    Path(listing_name): Path<String>,
) -> Response
where
    S: ReviewSource + 'static,
    A: ApprovalStore + 'static,
{
    match service.public_reviews(&listing_name).await {
        Ok(reviews) => {
            let payload = json!({
                "status": "success",
                "listingName": listing_name,
                "total": reviews.len(),
                "result": reviews,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

fn service_error_response(err: ReviewServiceError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
