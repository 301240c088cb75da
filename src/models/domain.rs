use serde::{Deserialize, Serialize};

/// Budget ceiling used when a user has not stated one
pub const DEFAULT_BUDGET_MAX: f64 = 5000.0;

/// Travel styles a user can pick in their profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TravelType {
    Adventure,
    Cultural,
    Luxury,
    Relax,
    Beach,
    Nature,
    Romantic,
    Family,
    Business,
    #[serde(other)]
    Unknown,
}

impl TravelType {
    /// Candidate tag this travel type maps to (lower-cased name)
    pub fn as_tag(&self) -> Option<&'static str> {
        match self {
            TravelType::Adventure => Some("adventure"),
            TravelType::Cultural => Some("cultural"),
            TravelType::Luxury => Some("luxury"),
            TravelType::Relax => Some("relax"),
            TravelType::Beach => Some("beach"),
            TravelType::Nature => Some("nature"),
            TravelType::Romantic => Some("romantic"),
            TravelType::Family => Some("family"),
            TravelType::Business => Some("business"),
            TravelType::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccommodationType {
    Hotel,
    Boutique,
    Resort,
    Spa,
    Hostel,
    Apartment,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String { "EUR".to_string() }

/// Travel preferences stored on the user profile
///
/// Every field is optional in storage, so `{}` deserializes to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(rename = "travelTypes", default)]
    pub travel_types: Vec<TravelType>,
    #[serde(rename = "budgetRange", default)]
    pub budget_range: Option<BudgetRange>,
    #[serde(rename = "preferredAccommodations", default)]
    pub preferred_accommodations: Vec<AccommodationType>,
}

impl UserPreferences {
    /// Lower-cased tags derived from the travel types
    pub fn preferred_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .travel_types
            .iter()
            .filter_map(|t| t.as_tag())
            .map(str::to_string)
            .collect();
        tags.sort_unstable();
        tags.dedup();
        tags
    }

    /// Upper bound of the trip budget, falling back to the default ceiling
    pub fn budget_max(&self) -> f64 {
        match &self.budget_range {
            Some(range) if range.max > 0.0 => range.max,
            _ => DEFAULT_BUDGET_MAX,
        }
    }
}

/// User record as seen by the recommendation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub rating: f64,
    #[serde(rename = "vrAvailable", default)]
    pub vr_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "destinationId", default)]
    pub destination_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price: Money,
    #[serde(rename = "durationMinutes", default)]
    pub duration_minutes: Option<u32>,
    #[serde(rename = "vrAvailable", default)]
    pub vr_available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Factor {
    PreferenceMatch,
    Popularity,
    VrExperience,
    Diversity,
}

/// Named weight explaining part of a recommendation; not fed back into scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceFactor {
    pub factor: Factor,
    pub weight: f64,
}

/// Candidate with its score and explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate<T> {
    #[serde(flatten)]
    pub candidate: T,
    pub score: f64,
    #[serde(rename = "relevanceFactors")]
    pub relevance_factors: Vec<RelevanceFactor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecommendationType {
    #[default]
    Destination,
    Activity,
}

impl RecommendationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationType::Destination => "DESTINATION",
            RecommendationType::Activity => "ACTIVITY",
        }
    }
}

impl std::fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ranked items; the shape that is cached per (user, type, count)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecommendationItems {
    Destinations(Vec<ScoredCandidate<Destination>>),
    Activities(Vec<ScoredCandidate<Activity>>),
}

impl RecommendationItems {
    pub fn len(&self) -> usize {
        match self {
            RecommendationItems::Destinations(items) => items.len(),
            RecommendationItems::Activities(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Envelope handed to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    #[serde(rename = "recommendationId")]
    pub recommendation_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub items: RecommendationItems,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "expiresAt")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Candidate-pool query for destinations
///
/// Matches when any tag is in `tags`, or when the rating reaches `min_rating`.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationFilter {
    pub tags: Vec<String>,
    pub min_rating: f64,
}

/// Candidate-pool query for activities
///
/// Matches when (any tag is in `tags` or VR is available) and the price
/// amount does not exceed `max_price`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityFilter {
    pub tags: Vec<String>,
    pub include_vr: bool,
    pub max_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierPrice {
    pub total: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    pub id: String,
    pub origin: String,
    pub destination: String,
    #[serde(rename = "departureDate")]
    pub departure_date: String,
    #[serde(rename = "returnDate", default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    pub price: SupplierPrice,
    #[serde(rename = "availableSeats")]
    pub available_seats: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOffer {
    #[serde(rename = "hotelId")]
    pub hotel_id: String,
    pub name: String,
    #[serde(rename = "cityCode")]
    pub city_code: String,
    pub rating: f64,
    pub price: SupplierPrice,
    #[serde(default)]
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPrice {
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityOffer {
    #[serde(rename = "activityId")]
    pub activity_id: String,
    pub name: String,
    #[serde(rename = "cityCode")]
    pub city_code: String,
    pub duration: String,
    pub price: ActivityPrice,
    pub rating: f64,
    #[serde(rename = "bookingDate")]
    pub booking_date: String,
}

/// Response envelope used by the travel supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierResponse<T> {
    pub data: Vec<T>,
}
