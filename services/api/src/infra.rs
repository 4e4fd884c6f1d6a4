use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use reviewdeck::reviews::{ApprovalStore, ApprovalStoreError, ReviewSource, SourceError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Source serving a fixed batch of raw records, used by the CLI commands and
/// the route tests.
pub(crate) struct StaticReviewSource {
    records: Vec<Value>,
}

impl StaticReviewSource {
    pub(crate) fn new(records: Vec<Value>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ReviewSource for StaticReviewSource {
    async fn fetch_raw(&self) -> Result<Vec<Value>, SourceError> {
        Ok(self.records.clone())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryApprovalStore {
    approvals: Arc<Mutex<HashMap<i64, bool>>>,
}

impl ApprovalStore for InMemoryApprovalStore {
    fn get(&self) -> Result<HashMap<i64, bool>, ApprovalStoreError> {
        let guard = self.approvals.lock().expect("approvals mutex poisoned");
        Ok(guard.clone())
    }

    fn set(&self, review_id: i64, display: bool) -> Result<(), ApprovalStoreError> {
        let mut guard = self.approvals.lock().expect("approvals mutex poisoned");
        guard.insert(review_id, display);
        Ok(())
    }
}
