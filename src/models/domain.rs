use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Upstream generative-language provider families served by the proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderKind {
    /// Last-resort model, always appended to the candidate list
    pub fn stable_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.5-flash",
            ProviderKind::OpenAi => "gpt-4o-mini",
        }
    }

    /// Whether the provider addresses models under the `models/` namespace
    pub fn uses_model_namespace(&self) -> bool {
        matches!(self, ProviderKind::Gemini)
    }

    /// Human-facing name used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "Gemini",
            ProviderKind::OpenAi => "OpenAI",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One conversation turn in role/content form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        let role = role.into();
        Self {
            role: if role.trim().is_empty() { default_role() } else { role },
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(default_role(), content)
    }
}

fn default_role() -> String {
    "user".to_string()
}

/// Canonical form of an inbound proxy request
///
/// `messages` is never empty and every entry carries non-blank content.
/// `passthrough` holds the caller's opaque fields, forwarded verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct PairingRequest {
    pub explicit_model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub passthrough: Map<String, Value>,
}

/// Ordered, duplicate-free list of model identifiers to try
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCandidateList(Vec<String>);

impl ModelCandidateList {
    /// Build from models in priority order, keeping the first occurrence of each
    pub fn from_ordered<I>(models: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for model in models {
            if !unique.contains(&model) {
                unique.push(model);
            }
        }
        Self(unique)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

/// Outcome of a single upstream call
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamAttempt {
    pub model_tried: String,
    pub http_status: u16,
    pub parsed_body: Option<Value>,
    pub raw_body: String,
}

impl UpstreamAttempt {
    /// Record a response; a body that is empty or not JSON leaves `parsed_body` unset
    pub fn new(model_tried: impl Into<String>, http_status: u16, raw_body: impl Into<String>) -> Self {
        let raw_body = raw_body.into();
        let parsed_body = if raw_body.is_empty() {
            None
        } else {
            serde_json::from_str(&raw_body).ok()
        };

        Self {
            model_tried: model_tried.into(),
            http_status,
            parsed_body,
            raw_body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.http_status)
    }

    pub fn is_not_found(&self) -> bool {
        self.http_status == 404
    }

    /// Upstream error payload as returned to the caller: parsed JSON, else raw text
    pub fn raw_error(&self) -> Option<Value> {
        self.parsed_body.clone().or_else(|| {
            if self.raw_body.is_empty() {
                None
            } else {
                Some(Value::String(self.raw_body.clone()))
            }
        })
    }
}

/// Classification of a failed proxy request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Missing API key or unusable provider settings
    Configuration,
    /// No usable prompt, messages or contents
    InvalidArgument,
    /// Every candidate model answered "not found"
    ExhaustedNotFound,
    /// Upstream answered with a non-success status other than 404
    UpstreamStatus,
    /// Network failure or timeout talking to upstream
    Transport,
}

/// Terminal failure of a proxy request
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyFailure {
    pub kind: ErrorKind,
    pub status: u16,
    pub message: String,
    pub attempted_models: Vec<String>,
    pub available_models: Option<Vec<String>>,
    pub raw_error: Option<Value>,
}

impl ProxyFailure {
    /// Failure raised before any upstream call was made
    pub fn local(kind: ErrorKind, status: u16, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
            attempted_models: Vec::new(),
            available_models: None,
            raw_error: None,
        }
    }
}

/// Result of running one request through the proxy
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyResult {
    Success {
        suggestion_text: String,
        model_used: String,
        fallback_from: Option<String>,
    },
    Failure(ProxyFailure),
}

impl ProxyResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProxyResult::Success { .. })
    }
}

/// Vintage as stored by the front-end: a number or free text such as "NV"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Vintage {
    Year(u16),
    Label(String),
}

impl fmt::Display for Vintage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vintage::Year(year) => write!(f, "{}", year),
            Vintage::Label(label) => f.write_str(label),
        }
    }
}

/// The few wine fields needed to describe a bottle in a pairing prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WineSummary {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub producer: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub year: Option<Vintage>,
}

impl WineSummary {
    /// A wine can be described once it has a name, producer or region
    pub fn is_identifiable(&self) -> bool {
        [&self.name, &self.producer, &self.region]
            .iter()
            .any(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}
