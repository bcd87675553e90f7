use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::models::domain::{ChatMessage, WineSummary};

/// Inbound body of the proxy endpoints
///
/// `model`, `prompt`, `messages` and `contents` are consumed by the proxy;
/// anything else lands in `passthrough` and is forwarded upstream untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_model")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<ChatMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<ContentEntry>>,
    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

impl ProxyRequest {
    pub fn from_prompt(prompt: impl Into<String>, model: Option<String>) -> Self {
        Self {
            model,
            prompt: Some(prompt.into()),
            ..Default::default()
        }
    }
}

/// A `model` that is not a string is treated as absent
fn lenient_model<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_str().map(str::to_string)))
}

/// Gemini-style content entry: a role and its parts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentEntry {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

/// Only text parts matter; inline data and other part kinds are ignored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(default)]
    pub text: Option<String>,
}

/// Request food suggestions for one wine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodForWineRequest {
    pub wine: WineSummary,
    #[serde(default, deserialize_with = "lenient_model")]
    pub model: Option<String>,
}

/// Request wines from the cellar that suit a dish
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WineForFoodRequest {
    #[validate(length(min = 1))]
    pub food: String,
    #[validate(length(min = 1))]
    pub wines: Vec<WineSummary>,
    #[serde(default, deserialize_with = "lenient_model")]
    pub model: Option<String>,
}

/// Label photo to run text detection on
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LabelScanRequest {
    /// Data URL, e.g. `data:image/jpeg;base64,...`
    #[validate(length(min = 1))]
    #[serde(default)]
    pub image: String,
}
