// Route exports
pub mod auth;
pub mod error;
pub mod health;
pub mod recommendations;
pub mod travel;

use actix_web::web;
use std::sync::Arc;

use crate::models::BackendInfo;
use crate::services::{CacheManager, JwtValidator, RecommendationService, SupplierService};

pub use error::{handle_json_payload_error, handle_query_payload_error, ApiError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recommendations: Arc<RecommendationService>,
    pub supplier: Arc<SupplierService>,
    pub cache: Arc<CacheManager>,
    pub auth: Arc<JwtValidator>,
    pub limits: RecommendationLimits,
}

/// Count bounds applied to recommendation requests
#[derive(Debug, Clone, Copy)]
pub struct RecommendationLimits {
    pub default_count: u16,
    pub max_count: u16,
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        Self {
            default_count: 5,
            max_count: 20,
        }
    }
}

impl AppState {
    pub fn backends(&self) -> BackendInfo {
        BackendInfo {
            cache: self.cache.backend().to_string(),
            catalog: self.recommendations.catalog_backend().to_string(),
            supplier: self.supplier.backend().to_string(),
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/v1")
                .configure(recommendations::configure)
                .configure(travel::configure),
        );
}
