use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::domain::{ErrorKind, ProxyFailure};

/// Successful proxy response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub suggestion: String,
}

/// Failed proxy response
///
/// `availableModels` is only emitted for exhausted-not-found failures, where
/// it may be `null` if the model listing could not be fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attempted_models: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_models: Option<Option<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_error: Option<Value>,
}

impl From<&ProxyFailure> for ProxyErrorBody {
    fn from(failure: &ProxyFailure) -> Self {
        let available_models = if failure.kind == ErrorKind::ExhaustedNotFound {
            Some(failure.available_models.clone())
        } else {
            None
        };

        Self {
            error: failure.message.clone(),
            attempted_models: failure.attempted_models.clone(),
            available_models,
            raw_error: failure.raw_error.clone(),
        }
    }
}

/// Simple `{ "error": ... }` body for rejections outside the proxy protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Label scan result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelScanResponse {
    pub success: bool,
    pub full_text: String,
}

/// Label scan failure with the upstream cause attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelScanError {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Which upstream integrations have credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub gemini: bool,
    pub openai: bool,
    pub vision: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub providers: ProviderStatus,
}
