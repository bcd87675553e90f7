use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::core::{food_for_wine_prompt, wine_for_food_prompt};
use crate::models::{ErrorResponse, FoodForWineRequest, ProxyRequest, WineForFoodRequest};
use crate::routes::{method_not_allowed, proxy::run_proxy, AppState};

/// Configure the pairing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/pairing/wine")
            .route(web::post().to(food_for_wine))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/pairing/food")
            .route(web::post().to(wine_for_food))
            .default_service(web::to(method_not_allowed)),
    );
}

/// Suggest dishes for a wine
///
/// POST /api/pairing/wine
///
/// Request body:
/// ```json
/// {
///   "wine": { "name": "string", "producer": "string", "region": "string", "color": "red", "year": 2016 },
///   "model": "optional model id"
/// }
/// ```
async fn food_for_wine(state: web::Data<AppState>, req: web::Json<FoodForWineRequest>) -> HttpResponse {
    let req = req.into_inner();

    if !req.wine.is_identifiable() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Please select a wine with enough details for pairing.",
        ));
    }

    let prompt = food_for_wine_prompt(&req.wine);
    run_proxy(&state, state.pairing_provider, ProxyRequest::from_prompt(prompt, req.model)).await
}

/// Suggest wines from the caller's cellar for a dish
///
/// POST /api/pairing/food
///
/// Request body:
/// ```json
/// {
///   "food": "string",
///   "wines": [{ "name": "string", "producer": "string" }],
///   "model": "optional model id"
/// }
/// ```
async fn wine_for_food(state: web::Data<AppState>, req: web::Json<WineForFoodRequest>) -> HttpResponse {
    let req = req.into_inner();

    if req.validate().is_err() || req.food.trim().is_empty() {
        tracing::info!("Rejecting wine-for-food request: food={:?}, wines={}", req.food, req.wines.len());
        let message = if req.food.trim().is_empty() {
            "Please enter a food item to find a wine pairing."
        } else {
            "Add at least one wine to pair with."
        };
        return HttpResponse::BadRequest().json(ErrorResponse::new(message));
    }

    let prompt = wine_for_food_prompt(&req.food, &req.wines);
    run_proxy(&state, state.pairing_provider, ProxyRequest::from_prompt(prompt, req.model)).await
}
