use actix_web::{web, HttpResponse, Responder};

use crate::models::HealthResponse;
use crate::routes::AppState;

/// Health check endpoint
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let catalog_healthy = state.recommendations.catalog_healthy().await;

    let status = if catalog_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        backends: state.backends(),
        cache: state.cache.stats(),
    })
}
