// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AccommodationType, Activity, ActivityFilter, ActivityOffer, BudgetRange, Destination,
    DestinationFilter, Factor, FlightOffer, HotelOffer, Money, RecommendationItems,
    RecommendationResult, RecommendationType, RelevanceFactor, ScoredCandidate, SupplierPrice,
    ActivityPrice, SupplierResponse, TravelType, UserPreferences, UserRecord,
};
pub use requests::{ActivitySearchQuery, FlightSearchQuery, HotelSearchQuery, RecommendationQuery};
pub use responses::{ApiResponse, BackendInfo, ErrorResponse, HealthResponse};
