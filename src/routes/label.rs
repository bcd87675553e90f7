use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::{ErrorResponse, LabelScanError, LabelScanRequest, LabelScanResponse};
use crate::routes::{method_not_allowed, AppState};
use crate::services::{split_data_url, VisionError};

const SCAN_FAILED: &str = "Failed to scan. Please ensure image is clear and try again.";

/// Configure the label scanning route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/label/scan")
            .route(web::post().to(scan_label))
            .default_service(web::to(method_not_allowed)),
    );
}

/// Read the text on a wine label photo
///
/// POST /api/label/scan
///
/// Request body:
/// ```json
/// { "image": "data:image/jpeg;base64,..." }
/// ```
async fn scan_label(state: web::Data<AppState>, req: web::Json<LabelScanRequest>) -> HttpResponse {
    if !state.vision.is_configured() {
        tracing::error!("Rejecting label scan: no API key configured");
        return HttpResponse::InternalServerError().json(ErrorResponse::new(VisionError::MissingApiKey.to_string()));
    }

    if req.validate().is_err() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(VisionError::MissingImage.to_string()));
    }

    let (payload, decoded_len) = match split_data_url(&req.image) {
        Ok(parts) => parts,
        Err(e) => {
            tracing::info!("Rejecting label scan: {}", e);
            return HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string()));
        }
    };

    tracing::debug!("Scanning label image ({} bytes)", decoded_len);

    match state.vision.detect_text(payload).await {
        Ok(full_text) => HttpResponse::Ok().json(LabelScanResponse {
            success: true,
            full_text,
        }),
        Err(e) => {
            tracing::error!("Label scan failed: {}", e);
            HttpResponse::InternalServerError().json(LabelScanError {
                error: SCAN_FAILED.to_string(),
                details: Some(e.to_string()),
            })
        }
    }
}
