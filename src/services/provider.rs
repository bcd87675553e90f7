use serde_json::{json, Map, Value};

use crate::core::resolver::MODEL_NAMESPACE;
use crate::models::{ChatMessage, PairingRequest, ProviderKind};

/// Endpoint template and message shape for one upstream provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    kind: ProviderKind,
    base_url: String,
    api_version: String,
    chat_path: String,
    models_path: String,
}

impl ProviderEndpoint {
    /// Gemini `generateContent` addressing: `{base}/{version}/models/{model}:generateContent`
    pub fn gemini(base_url: &str, api_version: &str) -> Self {
        Self {
            kind: ProviderKind::Gemini,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: api_version.trim_matches('/').to_string(),
            chat_path: String::new(),
            models_path: String::new(),
        }
    }

    /// OpenAI chat-completions addressing: `{base}{chat_path}`
    pub fn openai(base_url: &str, chat_path: &str, models_path: &str) -> Self {
        Self {
            kind: ProviderKind::OpenAi,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: String::new(),
            chat_path: leading_slash(chat_path),
            models_path: leading_slash(models_path),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// URL of the generation call; the key is only embedded for Gemini
    pub fn generate_url(&self, model: &str, api_key: &str) -> String {
        match self.kind {
            ProviderKind::Gemini => format!(
                "{}/{}/{}{}:generateContent?key={}",
                self.base_url,
                self.api_version,
                MODEL_NAMESPACE,
                urlencoding::encode(model),
                urlencoding::encode(api_key)
            ),
            ProviderKind::OpenAi => format!("{}{}", self.base_url, self.chat_path),
        }
    }

    /// URL of the model listing call
    pub fn list_models_url(&self, api_key: &str) -> String {
        match self.kind {
            ProviderKind::Gemini => format!(
                "{}/{}/models?key={}",
                self.base_url,
                self.api_version,
                urlencoding::encode(api_key)
            ),
            ProviderKind::OpenAi => format!("{}{}", self.base_url, self.models_path),
        }
    }

    /// Bearer token header value, for providers authenticating that way
    pub fn bearer(&self, api_key: &str) -> Option<String> {
        match self.kind {
            ProviderKind::Gemini => None,
            ProviderKind::OpenAi => Some(format!("Bearer {}", api_key)),
        }
    }

    /// Where a model was looked up, for "not available" messages
    pub fn location(&self) -> String {
        match self.kind {
            ProviderKind::Gemini => format!(
                "for API version \"{}\" at {}",
                self.api_version, self.base_url
            ),
            ProviderKind::OpenAi => format!("at {}{}", self.base_url, self.chat_path),
        }
    }

    /// Request body for one model, with passthrough fields merged underneath
    pub fn build_payload(&self, model: &str, request: &PairingRequest) -> Value {
        let mut payload: Map<String, Value> = request.passthrough.clone();

        match self.kind {
            ProviderKind::Gemini => {
                let (mut system, mut turns): (Vec<&ChatMessage>, Vec<&ChatMessage>) = request
                    .messages
                    .iter()
                    .partition(|m| m.role == "system");

                // contents must not be empty; a system-only conversation is sent as user turns
                if turns.is_empty() {
                    std::mem::swap(&mut system, &mut turns);
                }

                let contents: Vec<Value> = turns
                    .iter()
                    .map(|m| json!({ "role": gemini_role(&m.role), "parts": [{ "text": m.content }] }))
                    .collect();

                if !system.is_empty() {
                    let parts: Vec<Value> = system.iter().map(|m| json!({ "text": m.content })).collect();
                    payload.insert("systemInstruction".to_string(), json!({ "parts": parts }));
                }
                payload.insert("contents".to_string(), Value::Array(contents));
                payload.insert("model".to_string(), Value::String(format!("{}{}", MODEL_NAMESPACE, model)));
            }
            ProviderKind::OpenAi => {
                payload.insert("model".to_string(), Value::String(model.to_string()));
                payload.insert("messages".to_string(), json!(request.messages));
            }
        }

        Value::Object(payload)
    }

    /// Model identifiers from a listing response
    pub fn parse_model_list(&self, body: &Value) -> Option<Vec<String>> {
        let (array_key, name_key) = match self.kind {
            ProviderKind::Gemini => ("models", "name"),
            ProviderKind::OpenAi => ("data", "id"),
        };

        let entries = body.get(array_key)?.as_array()?;
        Some(
            entries
                .iter()
                .filter_map(|entry| entry.get(name_key).and_then(Value::as_str))
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

fn gemini_role(role: &str) -> &str {
    match role {
        "assistant" | "model" => "model",
        _ => "user",
    }
}

fn leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(messages: Vec<ChatMessage>) -> PairingRequest {
        let mut passthrough = Map::new();
        passthrough.insert("generationConfig".to_string(), json!({"temperature": 0.4}));
        PairingRequest {
            explicit_model: None,
            messages,
            passthrough,
        }
    }

    #[test]
    fn test_gemini_urls() {
        let endpoint = ProviderEndpoint::gemini("https://generativelanguage.googleapis.com/", "v1beta");

        assert_eq!(
            endpoint.generate_url("gemini-2.5-flash", "k&y"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key=k%26y"
        );
        assert_eq!(
            endpoint.list_models_url("key"),
            "https://generativelanguage.googleapis.com/v1beta/models?key=key"
        );
        assert!(endpoint.bearer("key").is_none());
    }

    #[test]
    fn test_openai_urls() {
        let endpoint = ProviderEndpoint::openai("https://api.openai.com", "v1/chat/completions", "/v1/models");

        assert_eq!(endpoint.generate_url("gpt-4o-mini", "key"), "https://api.openai.com/v1/chat/completions");
        assert_eq!(endpoint.list_models_url("key"), "https://api.openai.com/v1/models");
        assert_eq!(endpoint.bearer("key").as_deref(), Some("Bearer key"));
    }

    #[test]
    fn test_gemini_payload_shape() {
        let endpoint = ProviderEndpoint::gemini("https://g.test", "v1beta");
        let payload = endpoint.build_payload(
            "gemini-x",
            &request(vec![
                ChatMessage::new("system", "You are a sommelier."),
                ChatMessage::user("Chablis?"),
                ChatMessage::new("assistant", "Oysters."),
            ]),
        );

        assert_eq!(payload["model"], "models/gemini-x");
        assert_eq!(payload["generationConfig"]["temperature"], 0.4);
        assert_eq!(payload["systemInstruction"]["parts"][0]["text"], "You are a sommelier.");
        assert_eq!(
            payload["contents"],
            json!([
                {"role": "user", "parts": [{"text": "Chablis?"}]},
                {"role": "model", "parts": [{"text": "Oysters."}]}
            ])
        );
    }

    #[test]
    fn test_gemini_system_only_conversation_becomes_user_turn() {
        let endpoint = ProviderEndpoint::gemini("https://g.test", "v1beta");
        let payload = endpoint.build_payload(
            "gemini-2.5-flash",
            &request(vec![ChatMessage::new("system", "Suggest a wine for lamb")]),
        );

        assert_eq!(
            payload["contents"],
            json!([{"role": "user", "parts": [{"text": "Suggest a wine for lamb"}]}])
        );
        assert!(payload.get("systemInstruction").is_none());
    }

    #[test]
    fn test_openai_payload_shape() {
        let endpoint = ProviderEndpoint::openai("https://o.test", "/v1/chat/completions", "/v1/models");
        let payload = endpoint.build_payload("gpt-4o", &request(vec![ChatMessage::user("Port?")]));

        assert_eq!(payload["model"], "gpt-4o");
        assert_eq!(payload["messages"], json!([{"role": "user", "content": "Port?"}]));
        assert!(payload.get("systemInstruction").is_none());
    }

    #[test]
    fn test_model_list_parsing() {
        let gemini = ProviderEndpoint::gemini("https://g.test", "v1");
        let body = json!({"models": [{"name": "models/gemini-2.5-flash"}, {"displayName": "x"}]});
        assert_eq!(gemini.parse_model_list(&body), Some(vec!["models/gemini-2.5-flash".to_string()]));
        assert_eq!(gemini.parse_model_list(&json!({})), None);

        let openai = ProviderEndpoint::openai("https://o.test", "/c", "/m");
        let body = json!({"data": [{"id": "gpt-4o"}, {"id": "gpt-4o-mini"}]});
        assert_eq!(openai.parse_model_list(&body).map(|m| m.len()), Some(2));
    }

    #[test]
    fn test_location_wording() {
        let gemini = ProviderEndpoint::gemini("https://g.test", "v1beta");
        assert_eq!(gemini.location(), "for API version \"v1beta\" at https://g.test");
    }
}
