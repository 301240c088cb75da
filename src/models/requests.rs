use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};
use crate::models::domain::RecommendationType;

/// Query for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendationQuery {
    #[serde(rename = "type", default)]
    pub kind: RecommendationType,
    /// Falls back to the configured default count when absent
    #[validate(range(min = 1, max = 20, message = "Count must be between 1 and 20"))]
    #[serde(default)]
    pub count: Option<u16>,
}

/// Flight search query
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FlightSearchQuery {
    #[validate(custom(function = "validate_iata_code"))]
    pub origin: String,
    #[validate(custom(function = "validate_iata_code"))]
    pub destination: String,
    #[serde(rename = "departureDate")]
    pub departure_date: NaiveDate,
    #[serde(rename = "returnDate", default)]
    pub return_date: Option<NaiveDate>,
    #[validate(range(min = 1, message = "Adults must be a positive integer"))]
    #[serde(default)]
    pub adults: Option<u16>,
}

/// Airport codes are exactly three ASCII letters
fn validate_iata_code(code: &str) -> Result<(), ValidationError> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new("iata_code")
            .with_message(Cow::Borrowed("Airport code must be a 3-letter IATA code")))
    }
}

/// Hotel search query
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HotelSearchQuery {
    #[validate(length(min = 3, message = "City code is required"))]
    #[serde(rename = "cityCode")]
    pub city_code: String,
    #[serde(rename = "checkInDate")]
    pub check_in_date: NaiveDate,
    #[serde(rename = "checkOutDate")]
    pub check_out_date: NaiveDate,
    #[validate(range(min = 1, message = "Guests must be a positive integer"))]
    #[serde(default)]
    pub guests: Option<u16>,
}

/// Activity search query
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ActivitySearchQuery {
    #[validate(length(min = 3, message = "City code is required"))]
    #[serde(rename = "cityCode")]
    pub city_code: String,
    pub date: NaiveDate,
}
