use crate::core::extract::{extract_error_message, extract_suggestion};
use crate::models::{ErrorKind, ModelCandidateList, PairingRequest, ProxyFailure, ProxyResult};
use crate::services::Upstream;

/// Try each candidate model in order until one answers
///
/// Only a 404 moves on to the next candidate; any other failure status, and
/// any transport error, ends the request immediately. Calls are strictly
/// sequential. When every candidate answers 404 the upstream model listing
/// is fetched to enrich the error; if that listing fails the error reports
/// `available_models = None` instead.
pub async fn call_with_fallback<U>(
    upstream: &U,
    candidates: &ModelCandidateList,
    request: &PairingRequest,
) -> ProxyResult
where
    U: Upstream + ?Sized,
{
    let kind = upstream.kind();
    let mut attempted: Vec<String> = Vec::with_capacity(candidates.len());

    for (index, model) in candidates.iter().enumerate() {
        attempted.push(model.clone());

        let attempt = match upstream.generate(model, request).await {
            Ok(attempt) => attempt,
            Err(e) => {
                tracing::error!("{} call for model {} failed: {}", kind, model, e);
                return ProxyResult::Failure(ProxyFailure {
                    kind: ErrorKind::Transport,
                    status: 500,
                    message: format!("Proxy Error: {}", e),
                    attempted_models: attempted,
                    available_models: None,
                    raw_error: None,
                });
            }
        };

        if attempt.is_success() {
            let fallback_from = if index > 0 {
                candidates.first().map(str::to_string)
            } else {
                None
            };

            if let Some(original) = &fallback_from {
                tracing::info!("{} fell back from {} to {}", kind, original, model);
            }

            return ProxyResult::Success {
                suggestion_text: extract_suggestion(kind, attempt.parsed_body.as_ref()),
                model_used: model.clone(),
                fallback_from,
            };
        }

        if attempt.is_not_found() {
            if index + 1 < candidates.len() {
                tracing::warn!("{} model {} not found, trying next candidate", kind, model);
                continue;
            }

            let available_models = match upstream.list_models().await {
                Ok(models) => Some(models),
                Err(e) => {
                    tracing::warn!("Failed to list {} models: {}", kind, e);
                    None
                }
            };

            return ProxyResult::Failure(ProxyFailure {
                kind: ErrorKind::ExhaustedNotFound,
                status: 404,
                message: not_available_message(&attempted, &upstream.location()),
                raw_error: attempt.raw_error(),
                attempted_models: attempted,
                available_models,
            });
        }

        tracing::warn!("{} model {} answered HTTP {}", kind, model, attempt.http_status);

        return ProxyResult::Failure(ProxyFailure {
            kind: ErrorKind::UpstreamStatus,
            status: attempt.http_status,
            message: extract_error_message(kind, &attempt),
            raw_error: attempt.raw_error(),
            attempted_models: attempted,
            available_models: None,
        });
    }

    ProxyResult::Failure(ProxyFailure::local(
        ErrorKind::Configuration,
        500,
        "No candidate models configured.",
    ))
}

/// Error text for an exhausted candidate list
pub fn not_available_message(attempted: &[String], location: &str) -> String {
    let quoted = attempted
        .iter()
        .map(|m| format!("\"{}\"", m))
        .collect::<Vec<_>>()
        .join(", ");

    if attempted.len() == 1 {
        format!("Model {} is not available {}.", quoted, location)
    } else {
        format!("Model(s) {} are not available {}.", quoted, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChatMessage, ProviderKind, UpstreamAttempt};
    use crate::services::UpstreamError;
    use async_trait::async_trait;
    use serde_json::Map;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned statuses and records which models were called
    struct Scripted {
        replies: Mutex<VecDeque<Result<(u16, &'static str), ()>>>,
        calls: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<(u16, &'static str), ()>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Upstream for Scripted {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Gemini
        }

        fn is_configured(&self) -> bool {
            true
        }

        fn location(&self) -> String {
            "for API version \"v1beta\" at https://g.test".to_string()
        }

        async fn generate(&self, model: &str, _request: &PairingRequest) -> Result<UpstreamAttempt, UpstreamError> {
            self.calls.lock().unwrap().push(model.to_string());
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok((status, body))) => Ok(UpstreamAttempt::new(model, status, body)),
                _ => Err(UpstreamError::Timeout(5)),
            }
        }

        async fn list_models(&self) -> Result<Vec<String>, UpstreamError> {
            Err(UpstreamError::ApiError(500))
        }
    }

    fn request() -> PairingRequest {
        PairingRequest {
            explicit_model: None,
            messages: vec![ChatMessage::user("hi")],
            passthrough: Map::new(),
        }
    }

    fn candidates(models: &[&str]) -> ModelCandidateList {
        ModelCandidateList::from_ordered(models.iter().map(|m| m.to_string()))
    }

    #[test]
    fn test_first_candidate_success_has_no_fallback() {
        let upstream = Scripted::new(vec![Ok((200, "{}"))]);
        let result = tokio_test::block_on(call_with_fallback(&upstream, &candidates(&["a", "b"]), &request()));

        assert_eq!(
            result,
            ProxyResult::Success {
                suggestion_text: "No suggestion received.".to_string(),
                model_used: "a".to_string(),
                fallback_from: None,
            }
        );
        assert_eq!(upstream.calls(), ["a"]);
    }

    #[test]
    fn test_timeout_is_not_retried() {
        let upstream = Scripted::new(vec![Err(())]);
        let result = tokio_test::block_on(call_with_fallback(&upstream, &candidates(&["a", "b"]), &request()));

        match result {
            ProxyResult::Failure(failure) => {
                assert_eq!(failure.kind, ErrorKind::Transport);
                assert_eq!(failure.status, 500);
                assert!(failure.message.starts_with("Proxy Error: "));
                assert_eq!(failure.attempted_models, ["a"]);
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(upstream.calls(), ["a"]);
    }

    #[test]
    fn test_single_candidate_not_found_wording() {
        let upstream = Scripted::new(vec![Ok((404, ""))]);
        let result = tokio_test::block_on(call_with_fallback(&upstream, &candidates(&["only"]), &request()));

        match result {
            ProxyResult::Failure(failure) => {
                assert_eq!(failure.kind, ErrorKind::ExhaustedNotFound);
                assert_eq!(
                    failure.message,
                    "Model \"only\" is not available for API version \"v1beta\" at https://g.test."
                );
                assert!(failure.available_models.is_none());
                assert!(failure.raw_error.is_none());
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_candidate_list_is_a_configuration_error() {
        let upstream = Scripted::new(vec![]);
        let empty = ModelCandidateList::from_ordered(Vec::<String>::new());
        let result = tokio_test::block_on(call_with_fallback(&upstream, &empty, &request()));

        assert!(matches!(result, ProxyResult::Failure(ProxyFailure { kind: ErrorKind::Configuration, .. })));
        assert!(upstream.calls().is_empty());
    }

    #[test]
    fn test_not_available_message_lists_every_model() {
        let message = not_available_message(&["a".to_string(), "b".to_string()], "at https://o.test/v1/chat");
        assert_eq!(message, "Model(s) \"a\", \"b\" are not available at https://o.test/v1/chat.");
    }
}
