use async_trait::async_trait;
use serde_json::Value;

/// Upstream provider of raw review records.
///
/// Implementations return records in the booking API's own shape; the
/// normalizer owns all coercion, so a source never massages fields.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    async fn fetch_raw(&self) -> Result<Vec<Value>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("review source authentication failed: {0}")]
    Auth(String),
    #[error("review source request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("review source returned an unexpected payload: {0}")]
    Payload(String),
}
