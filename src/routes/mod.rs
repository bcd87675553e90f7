// Route exports
pub mod label;
pub mod pairing;
pub mod proxy;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::config::Settings;
use crate::core::{ModelResolver, PairingProxy};
use crate::models::{ErrorResponse, ProviderKind};
use crate::services::{HttpUpstream, ProviderEndpoint, UpstreamError, VisionClient, VisionError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub gemini: PairingProxy,
    pub openai: PairingProxy,
    pub vision: Arc<VisionClient>,
    pub pairing_provider: ProviderKind,
}

/// Errors raised while wiring the application state
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Upstream client setup failed: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Vision client setup failed: {0}")]
    Vision(#[from] VisionError),
}

impl AppState {
    /// Build every upstream client from settings
    pub fn from_settings(settings: &Settings) -> Result<Self, StateError> {
        let timeout = settings.upstream.timeout_secs;

        let gemini = HttpUpstream::new(
            ProviderEndpoint::gemini(&settings.gemini.api_base_url, &settings.gemini.api_version),
            settings.gemini.api_key.clone(),
            timeout,
        )?;
        let openai = HttpUpstream::new(
            ProviderEndpoint::openai(
                &settings.openai.api_base_url,
                &settings.openai.chat_path,
                &settings.openai.models_path,
            ),
            settings.openai.api_key.clone(),
            timeout,
        )?;
        let vision = VisionClient::new(
            &settings.vision.api_base_url,
            &settings.vision.api_version,
            settings.vision_api_key(),
            timeout,
        )?;

        Ok(Self {
            gemini: PairingProxy::new(
                ModelResolver::new(ProviderKind::Gemini, settings.gemini.model.as_deref()),
                Arc::new(gemini),
            ),
            openai: PairingProxy::new(
                ModelResolver::new(ProviderKind::OpenAi, settings.openai.model.as_deref()),
                Arc::new(openai),
            ),
            vision: Arc::new(vision),
            pairing_provider: settings.pairing.provider,
        })
    }

    pub fn proxy(&self, kind: ProviderKind) -> &PairingProxy {
        match kind {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::OpenAi => &self.openai,
        }
    }
}

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Largest accepted JSON body; label photos arrive inline as base64
pub const MAX_JSON_BYTES: usize = 10 * 1024 * 1024;

/// JSON extractor settings: lenient about content type, strict about syntax
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_BYTES)
        .content_type_required(false)
        .error_handler(handle_json_payload_error)
}

/// Fallback for any non-POST method on a POST-only resource
pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(ErrorResponse::new("Method Not Allowed. Use POST."))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(proxy::health_check))
        .service(
            web::scope("/api")
                .configure(proxy::configure)
                .configure(pairing::configure)
                .configure(label::configure),
        );
}
