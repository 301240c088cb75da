use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::{ApiResponse, RecommendationQuery};
use crate::routes::{auth::AuthenticatedUser, error::ApiError, AppState};

/// Configure recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/ai/recommendations", web::get().to(get_recommendations));
}

/// Recommendations for the authenticated user
///
/// GET /api/v1/ai/recommendations?type=DESTINATION&count=5
async fn get_recommendations(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<RecommendationQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let count = usize::from(query.count.unwrap_or(state.limits.default_count))
        .min(usize::from(state.limits.max_count));

    tracing::info!("Recommendations for user: {}, type: {}, count: {}", user.user_id, query.kind, count);

    let result = state
        .recommendations
        .get_recommendations(&user.user_id, query.kind, count)
        .await?;

    tracing::info!("Returning {} recommendations for user {}", result.items.len(), user.user_id);

    Ok(HttpResponse::Ok().json(ApiResponse::ok(result)))
}
