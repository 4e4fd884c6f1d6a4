use super::source::{ReviewSource, SourceError};
use crate::config::HostawaySettings;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::info;

/// Seconds shaved off the advertised token lifetime so a token is refreshed
/// before the API would actually reject it.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 120;

/// Cached OAuth credential for the booking API, carried as an explicit value
/// rather than ambient global state.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Client for the Hostaway reviews endpoint using the client-credentials
/// grant. The token slot is re-checked on every fetch and refreshed once the
/// cached credential reports itself expired.
pub struct HostawayClient {
    http: reqwest::Client,
    settings: HostawaySettings,
    token: Mutex<Option<AccessToken>>,
}

impl HostawayClient {
    pub fn new(settings: HostawaySettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
            token: Mutex::new(None),
        }
    }

    async fn ensure_token(&self) -> Result<String, SourceError> {
        let mut slot = self.token.lock().await;
        if let Some(cached) = slot.as_ref() {
            if !cached.is_expired(Utc::now()) {
                return Ok(cached.token.clone());
            }
        }

        let refreshed = self.request_token().await?;
        info!(expires_at = %refreshed.expires_at, "refreshed booking API access token");
        let token = refreshed.token.clone();
        *slot = Some(refreshed);
        Ok(token)
    }

    async fn request_token(&self) -> Result<AccessToken, SourceError> {
        if !self.settings.has_credentials() {
            return Err(SourceError::Auth(
                "no account id or api key configured".to_string(),
            ));
        }

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.settings.account_id.as_str()),
            ("client_secret", self.settings.api_key.as_str()),
            ("scope", "general"),
        ];

        let response = self
            .http
            .post(format!("{}/v1/accessTokens", self.settings.base_url))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Auth(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let body: TokenResponse = response.json().await?;
        let lifetime = (body.expires_in - TOKEN_EXPIRY_MARGIN_SECS).max(0);
        Ok(AccessToken {
            token: body.access_token,
            expires_at: Utc::now() + Duration::seconds(lifetime),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct ReviewListResponse {
    status: String,
    #[serde(default)]
    result: Vec<Value>,
}

#[async_trait]
impl ReviewSource for HostawayClient {
    async fn fetch_raw(&self) -> Result<Vec<Value>, SourceError> {
        let token = self.ensure_token().await?;

        let response = self
            .http
            .get(format!("{}/v1/reviews", self.settings.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Payload(format!(
                "review endpoint returned {}",
                response.status()
            )));
        }

        let body: ReviewListResponse = response.json().await?;
        if !body.status.eq_ignore_ascii_case("success") {
            return Err(SourceError::Payload(format!(
                "review endpoint reported status '{}'",
                body.status
            )));
        }

        Ok(body.result)
    }
}
