use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use tracing::Instrument;

use crate::models::{HealthResponse, ProviderKind, ProviderStatus, ProxyErrorBody, ProxyRequest, ProxyResult, SuggestionResponse};
use crate::routes::{method_not_allowed, AppState};

/// Header naming the model that produced the suggestion
pub const MODEL_USED_HEADER: &str = "x-model-used";
/// Header naming the originally preferred model when a fallback happened
pub const MODEL_FALLBACK_HEADER: &str = "x-model-fallback";

/// Configure the provider proxy routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/gemini")
            .route(web::post().to(gemini_proxy))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/openai")
            .route(web::post().to(openai_proxy))
            .default_service(web::to(method_not_allowed)),
    );
}

/// Health check endpoint
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let providers = ProviderStatus {
        gemini: state.gemini.is_configured(),
        openai: state.openai.is_configured(),
        vision: state.vision.is_configured(),
    };

    let status = if providers.gemini || providers.openai { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        providers,
    })
}

/// Gemini proxy endpoint
///
/// POST /api/gemini
///
/// Request body:
/// ```json
/// {
///   "model": "gemini-2.5-flash",
///   "prompt": "string",
///   "generationConfig": { "temperature": 0.7 }
/// }
/// ```
async fn gemini_proxy(state: web::Data<AppState>, req: web::Json<ProxyRequest>) -> HttpResponse {
    run_proxy(&state, ProviderKind::Gemini, req.into_inner()).await
}

/// OpenAI proxy endpoint
///
/// POST /api/openai
///
/// Request body:
/// ```json
/// {
///   "model": "gpt-4o-mini",
///   "messages": [{ "role": "user", "content": "string" }]
/// }
/// ```
async fn openai_proxy(state: web::Data<AppState>, req: web::Json<ProxyRequest>) -> HttpResponse {
    run_proxy(&state, ProviderKind::OpenAi, req.into_inner()).await
}

/// Run a request through a provider's proxy inside a request span
pub(crate) async fn run_proxy(state: &AppState, kind: ProviderKind, request: ProxyRequest) -> HttpResponse {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("proxy", %request_id, provider = %kind);

    let result = state.proxy(kind).handle(request).instrument(span).await;
    into_response(result)
}

/// Map a proxy result onto the HTTP contract
pub fn into_response(result: ProxyResult) -> HttpResponse {
    match result {
        ProxyResult::Success {
            suggestion_text,
            model_used,
            fallback_from,
        } => {
            let mut response = HttpResponse::Ok();
            response.insert_header((MODEL_USED_HEADER, model_used));
            if let Some(original) = fallback_from {
                response.insert_header((MODEL_FALLBACK_HEADER, original));
            }
            response.json(SuggestionResponse {
                suggestion: suggestion_text,
            })
        }
        ProxyResult::Failure(failure) => {
            let status = StatusCode::from_u16(failure.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            HttpResponse::build(status).json(ProxyErrorBody::from(&failure))
        }
    }
}
