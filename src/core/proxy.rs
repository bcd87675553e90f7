use std::sync::Arc;

use crate::core::{fallback::call_with_fallback, normalizer::normalize_request, resolver::ModelResolver};
use crate::models::{ErrorKind, ProviderKind, ProxyFailure, ProxyRequest, ProxyResult};
use crate::services::Upstream;

/// Request orchestrator for one provider
///
/// # Pipeline Stages
/// 1. Credential check
/// 2. Request normalization
/// 3. Candidate model resolution
/// 4. Sequential fallback calls
#[derive(Clone)]
pub struct PairingProxy {
    resolver: ModelResolver,
    upstream: Arc<dyn Upstream>,
}

impl PairingProxy {
    pub fn new(resolver: ModelResolver, upstream: Arc<dyn Upstream>) -> Self {
        Self { resolver, upstream }
    }

    pub fn kind(&self) -> ProviderKind {
        self.resolver.kind()
    }

    pub fn resolver(&self) -> &ModelResolver {
        &self.resolver
    }

    pub fn is_configured(&self) -> bool {
        self.upstream.is_configured()
    }

    /// Run one inbound request through the full pipeline
    pub async fn handle(&self, request: ProxyRequest) -> ProxyResult {
        let kind = self.kind();

        if !self.upstream.is_configured() {
            tracing::error!("Rejecting {} request: no API key configured", kind);
            return ProxyResult::Failure(ProxyFailure::local(
                ErrorKind::Configuration,
                500,
                format!("Missing {} API key.", kind.label()),
            ));
        }

        let pairing = match normalize_request(request) {
            Ok(pairing) => pairing,
            Err(e) => {
                tracing::info!("Rejecting {} request: {}", kind, e);
                return ProxyResult::Failure(ProxyFailure::local(ErrorKind::InvalidArgument, 400, e.to_string()));
            }
        };

        let candidates = self.resolver.candidates(pairing.explicit_model.as_deref());

        tracing::debug!(
            "{} request with {} message(s), candidates: {:?}",
            kind,
            pairing.messages.len(),
            candidates.as_slice()
        );

        call_with_fallback(self.upstream.as_ref(), &candidates, &pairing).await
    }
}
