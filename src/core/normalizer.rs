use thiserror::Error;

use crate::models::{ChatMessage, ContentEntry, PairingRequest, ProxyRequest};

/// Errors raised while normalizing an inbound request
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Request must include prompt, messages, or contents.")]
    NoUsableMessages,
}

/// Produce the canonical message list for a request
///
/// Precedence: a `messages` list with at least one non-blank entry, then a
/// non-blank `prompt`, then the text of a `contents` list.
pub fn normalize_messages(request: &ProxyRequest) -> Result<Vec<ChatMessage>, NormalizeError> {
    if let Some(messages) = request.messages.as_deref() {
        let usable: Vec<ChatMessage> = messages
            .iter()
            .filter(|m| !m.content.trim().is_empty())
            .map(|m| ChatMessage::new(m.role.clone(), m.content.clone()))
            .collect();

        if !usable.is_empty() {
            return Ok(usable);
        }
    }

    if let Some(prompt) = request.prompt.as_deref().map(str::trim) {
        if !prompt.is_empty() {
            return Ok(vec![ChatMessage::user(prompt)]);
        }
    }

    if let Some(contents) = request.contents.as_deref() {
        let flattened: Vec<ChatMessage> = contents.iter().filter_map(flatten_entry).collect();

        if !flattened.is_empty() {
            return Ok(flattened);
        }
    }

    Err(NormalizeError::NoUsableMessages)
}

/// Consume a request into its canonical form
pub fn normalize_request(request: ProxyRequest) -> Result<PairingRequest, NormalizeError> {
    let messages = normalize_messages(&request)?;

    Ok(PairingRequest {
        explicit_model: request.model,
        messages,
        passthrough: request.passthrough,
    })
}

fn flatten_entry(entry: &ContentEntry) -> Option<ChatMessage> {
    let text = entry
        .parts
        .iter()
        .map(|part| part.text.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.trim();

    if text.is_empty() {
        return None;
    }

    Some(ChatMessage::new(entry.role.clone().unwrap_or_default(), text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentPart;

    fn part(text: &str) -> ContentPart {
        ContentPart { text: Some(text.to_string()) }
    }

    #[test]
    fn test_prompt_becomes_single_user_message() {
        let req = ProxyRequest::from_prompt("  Pair this Barolo  ", None);
        let messages = normalize_messages(&req).unwrap();

        assert_eq!(messages, vec![ChatMessage::user("Pair this Barolo")]);
    }

    #[test]
    fn test_messages_win_over_prompt() {
        let req = ProxyRequest {
            prompt: Some("ignored".into()),
            messages: Some(vec![ChatMessage::new("system", "be brief"), ChatMessage::user("hi")]),
            ..Default::default()
        };

        let messages = normalize_messages(&req).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
    }

    #[test]
    fn test_blank_messages_fall_through_to_prompt() {
        let req = ProxyRequest {
            prompt: Some("fallback".into()),
            messages: Some(vec![ChatMessage::user("   ")]),
            ..Default::default()
        };

        assert_eq!(normalize_messages(&req).unwrap(), vec![ChatMessage::user("fallback")]);
    }

    #[test]
    fn test_contents_are_flattened() {
        let req = ProxyRequest {
            contents: Some(vec![
                ContentEntry { role: None, parts: vec![part("line one"), part("line two")] },
                ContentEntry { role: Some("model".into()), parts: vec![part("  ")] },
                ContentEntry { role: Some("model".into()), parts: vec![part("answer")] },
            ]),
            ..Default::default()
        };

        let messages = normalize_messages(&req).unwrap();
        assert_eq!(
            messages,
            vec![
                ChatMessage::user("line one\nline two"),
                ChatMessage::new("model", "answer"),
            ]
        );
    }

    #[test]
    fn test_empty_contents_rejected() {
        let req = ProxyRequest {
            contents: Some(vec![ContentEntry { role: None, parts: vec![part(""), ContentPart::default()] }]),
            ..Default::default()
        };

        assert_eq!(normalize_messages(&req), Err(NormalizeError::NoUsableMessages));
    }

    #[test]
    fn test_nothing_supplied_rejected() {
        assert_eq!(
            normalize_request(ProxyRequest::default()).unwrap_err(),
            NormalizeError::NoUsableMessages
        );
    }
}
