use crate::models::{ModelCandidateList, ProviderKind};

/// Namespace qualifier some providers put in front of model identifiers
pub const MODEL_NAMESPACE: &str = "models/";

/// Trim a model identifier and strip a leading `models/` qualifier
///
/// Returns `None` when nothing usable is left.
pub fn normalise_model(model: &str) -> Option<String> {
    let trimmed = model.trim();
    let bare = trimmed.strip_prefix(MODEL_NAMESPACE).unwrap_or(trimmed).trim();

    if bare.is_empty() {
        None
    } else {
        Some(bare.to_string())
    }
}

/// Decides which upstream models to try, and in which order
///
/// Priority is: explicit request model, configured default, stable fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResolver {
    kind: ProviderKind,
    default_model: String,
    stable_model: String,
}

impl ModelResolver {
    pub fn new(kind: ProviderKind, configured_default: Option<&str>) -> Self {
        let stable_model = kind.stable_model().to_string();
        let default_model = configured_default
            .and_then(|model| namespaced_model(kind, model))
            .unwrap_or_else(|| stable_model.clone());

        Self {
            kind,
            default_model,
            stable_model,
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn stable_model(&self) -> &str {
        &self.stable_model
    }

    /// Validate a caller-supplied model, returning the identifier to use
    ///
    /// Blank values, values with a `:` version/alias suffix and, for providers
    /// without a model namespace, values still carrying `models/` are rejected.
    pub fn accept_explicit(&self, requested: Option<&str>) -> Option<String> {
        let trimmed = requested?.trim();
        if trimmed.is_empty() || trimmed.contains(':') {
            return None;
        }

        namespaced_model(self.kind, trimmed)
    }

    /// Ordered, duplicate-free candidates for one request
    pub fn candidates(&self, requested: Option<&str>) -> ModelCandidateList {
        let explicit = self.accept_explicit(requested);

        ModelCandidateList::from_ordered(
            explicit
                .into_iter()
                .chain([self.default_model.clone(), self.stable_model.clone()]),
        )
    }
}

/// Apply the provider's `models/` rule: stripped where the namespace exists,
/// rejected where it does not
fn namespaced_model(kind: ProviderKind, model: &str) -> Option<String> {
    if kind.uses_model_namespace() {
        return normalise_model(model);
    }

    let trimmed = model.trim();
    if trimmed.is_empty() || trimmed.starts_with(MODEL_NAMESPACE) {
        None
    } else {
        Some(trimmed.to_string())
    }
}
