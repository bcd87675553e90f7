use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{PairingRequest, ProviderKind, UpstreamAttempt};
use crate::services::provider::ProviderEndpoint;

/// Errors that can occur when talking to an upstream AI provider
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    RequestError(reqwest::Error),

    #[error("Upstream request timed out after {0}s")]
    Timeout(u64),

    #[error("No API key configured for {0}")]
    MissingApiKey(ProviderKind),

    #[error("API returned error: HTTP {0}")]
    ApiError(u16),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

// Gemini URLs carry the API key as a query parameter
impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::RequestError(err.without_url())
    }
}

/// A generative-language API the fallback engine can call
#[async_trait]
pub trait Upstream: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Whether credentials are present; unconfigured upstreams are never called
    fn is_configured(&self) -> bool;

    /// Where models are looked up, used in "not available" messages
    fn location(&self) -> String;

    /// Issue one generation call for `model`
    ///
    /// Any HTTP status is an `Ok` attempt; only transport failures are errors.
    async fn generate(&self, model: &str, request: &PairingRequest) -> Result<UpstreamAttempt, UpstreamError>;

    /// Identifiers of the models the upstream currently offers
    async fn list_models(&self) -> Result<Vec<String>, UpstreamError>;
}

/// reqwest-backed upstream client
///
/// Holds one pooled HTTP client; safe to share across requests.
pub struct HttpUpstream {
    client: Client,
    endpoint: ProviderEndpoint,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl HttpUpstream {
    /// Create a new upstream client with a per-call timeout
    pub fn new(
        endpoint: ProviderEndpoint,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &ProviderEndpoint {
        &self.endpoint
    }

    fn key(&self) -> Result<&str, UpstreamError> {
        self.api_key
            .as_deref()
            .ok_or(UpstreamError::MissingApiKey(self.endpoint.kind()))
    }

    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout_secs)
        } else {
            UpstreamError::from(err)
        }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    fn kind(&self) -> ProviderKind {
        self.endpoint.kind()
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn location(&self) -> String {
        self.endpoint.location()
    }

    async fn generate(&self, model: &str, request: &PairingRequest) -> Result<UpstreamAttempt, UpstreamError> {
        let key = self.key()?;
        let payload = self.endpoint.build_payload(model, request);

        tracing::debug!("Calling {} model {}", self.endpoint.kind(), model);

        let mut call = self
            .client
            .post(self.endpoint.generate_url(model, key))
            .json(&payload);
        if let Some(bearer) = self.endpoint.bearer(key) {
            call = call.header(reqwest::header::AUTHORIZATION, bearer);
        }

        let response = call.send().await.map_err(|e| self.classify(e))?;
        let status = response.status().as_u16();
        let raw_body = response.text().await.map_err(|e| self.classify(e))?;

        tracing::debug!("{} model {} answered HTTP {}", self.endpoint.kind(), model, status);

        Ok(UpstreamAttempt::new(model, status, raw_body))
    }

    async fn list_models(&self) -> Result<Vec<String>, UpstreamError> {
        let key = self.key()?;

        let mut call = self.client.get(self.endpoint.list_models_url(key));
        if let Some(bearer) = self.endpoint.bearer(key) {
            call = call.header(reqwest::header::AUTHORIZATION, bearer);
        }

        let response = call.send().await.map_err(|e| self.classify(e))?;
        if !response.status().is_success() {
            return Err(UpstreamError::ApiError(response.status().as_u16()));
        }

        let json: Value = response.json().await.map_err(|e| self.classify(e))?;

        self.endpoint
            .parse_model_list(&json)
            .ok_or_else(|| UpstreamError::InvalidResponse("Missing model list".into()))
    }
}
