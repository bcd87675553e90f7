use serde_json::Value;

use crate::models::{ProviderKind, UpstreamAttempt};

/// Returned when a successful response carries no usable text
pub const NO_SUGGESTION: &str = "No suggestion received.";

/// JSON pointer to the generated text for a provider's success body
fn text_pointer(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Gemini => "/candidates/0/content/parts/0/text",
        ProviderKind::OpenAi => "/choices/0/message/content",
    }
}

/// Pull the generated text out of a success body
pub fn extract_suggestion(kind: ProviderKind, body: Option<&Value>) -> String {
    body.and_then(|b| b.pointer(text_pointer(kind)))
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .unwrap_or(NO_SUGGESTION)
        .to_string()
}

/// Best available error message for a failed upstream call
///
/// Tries `error.message`, then a string `error`, then the raw body, then a
/// generic message with the status code.
pub fn extract_error_message(kind: ProviderKind, attempt: &UpstreamAttempt) -> String {
    let parsed = attempt.parsed_body.as_ref();

    let structured = parsed
        .and_then(|b| b.pointer("/error/message"))
        .and_then(Value::as_str)
        .or_else(|| parsed.and_then(|b| b.get("error")).and_then(Value::as_str))
        .filter(|message| !message.is_empty());

    if let Some(message) = structured {
        return message.to_string();
    }

    if !attempt.raw_body.is_empty() {
        return attempt.raw_body.clone();
    }

    format!("{} API Error (HTTP {}).", kind.label(), attempt.http_status)
}
