use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::{ActivitySearchQuery, ApiResponse, FlightSearchQuery, HotelSearchQuery};
use crate::routes::{error::ApiError, AppState};

/// Configure travel search routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/travel")
            .route("/flights", web::get().to(search_flights))
            .route("/hotels", web::get().to(search_hotels))
            .route("/activities", web::get().to(search_activities)),
    );
}

/// GET /api/v1/travel/flights?origin=CDG&destination=JFK&departureDate=2025-07-15
async fn search_flights(
    state: web::Data<AppState>,
    query: web::Query<FlightSearchQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let flights = state
        .supplier
        .search_flights(&query.origin, &query.destination, query.departure_date, query.return_date)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(flights.data)))
}

/// GET /api/v1/travel/hotels?cityCode=PAR&checkInDate=2025-07-15&checkOutDate=2025-07-18
async fn search_hotels(
    state: web::Data<AppState>,
    query: web::Query<HotelSearchQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let hotels = state
        .supplier
        .search_hotels(&query.city_code, query.check_in_date, query.check_out_date)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(hotels.data)))
}

/// GET /api/v1/travel/activities?cityCode=PAR&date=2025-07-15
async fn search_activities(
    state: web::Data<AppState>,
    query: web::Query<ActivitySearchQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let activities = state
        .supplier
        .search_activities(&query.city_code, query.date)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(activities.data)))
}
