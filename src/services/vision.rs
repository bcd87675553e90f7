use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Returned when the label carries no readable text
pub const NO_TEXT_DETECTED: &str = "No text detected on label.";

/// Errors that can occur while scanning a label
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("HTTP request failed: {0}")]
    RequestError(reqwest::Error),

    #[error("Image data is required.")]
    MissingImage,

    #[error("Could not extract valid Base64 image data after splitting.")]
    InvalidImage,

    #[error("No API key configured for text detection")]
    MissingApiKey,

    #[error("API returned error: {0}")]
    ApiError(String),
}

// Request URLs carry the API key as a query parameter
impl From<reqwest::Error> for VisionError {
    fn from(err: reqwest::Error) -> Self {
        VisionError::RequestError(err.without_url())
    }
}

/// Take the base64 payload out of a data URL and check that it decodes
///
/// Returns the payload and its decoded size in bytes.
pub fn split_data_url(image: &str) -> Result<(&str, usize), VisionError> {
    if image.trim().is_empty() {
        return Err(VisionError::MissingImage);
    }

    let payload = image
        .split(',')
        .nth(1)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(VisionError::InvalidImage)?;

    let decoded = STANDARD
        .decode(payload)
        .map_err(|_| VisionError::InvalidImage)?;

    Ok((payload, decoded.len()))
}

/// Text-detection client for wine label photos
pub struct VisionClient {
    client: Client,
    base_url: String,
    api_version: String,
    api_key: Option<String>,
}

impl VisionClient {
    pub fn new(
        base_url: &str,
        api_version: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, VisionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: api_version.trim_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Run text detection on a base64 image, returning the full detected text
    pub async fn detect_text(&self, image_base64: &str) -> Result<String, VisionError> {
        let key = self.api_key.as_deref().ok_or(VisionError::MissingApiKey)?;

        let url = format!(
            "{}/{}/images:annotate?key={}",
            self.base_url,
            self.api_version,
            urlencoding::encode(key)
        );

        let payload = json!({
            "requests": [{
                "image": { "content": image_base64 },
                "features": [{ "type": "TEXT_DETECTION" }]
            }]
        });

        let response = self.client.post(&url).json(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Text detection failed: {} - {}", status, body);
            return Err(VisionError::ApiError(format!("HTTP {}", status.as_u16())));
        }

        let json: Value = response.json().await?;

        if let Some(message) = json.pointer("/responses/0/error/message").and_then(Value::as_str) {
            return Err(VisionError::ApiError(message.to_string()));
        }

        let text = json
            .pointer("/responses/0/textAnnotations/0/description")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or(NO_TEXT_DETECTED);

        Ok(text.to_string())
    }
}
