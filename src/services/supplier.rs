use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    ActivityOffer, ActivityPrice, FlightOffer, HotelOffer, SupplierPrice, SupplierResponse,
};
use crate::services::cache::{CacheKey, CacheManager};

/// Errors raised by a supplier client
#[derive(Debug, Error)]
pub enum SupplierClientError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Supplier returned status {0}")]
    Status(u16),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Uniform failure surfaced to callers of the search facade
///
/// Provider-specific details are logged, never returned.
#[derive(Debug, Error)]
pub enum SupplierError {
    #[error("Failed to search {operation}")]
    SearchFailed { operation: &'static str },
}

/// Upstream travel supplier
#[async_trait]
pub trait SupplierClient: Send + Sync {
    async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: NaiveDate,
        return_date: Option<NaiveDate>,
    ) -> Result<SupplierResponse<FlightOffer>, SupplierClientError>;

    async fn search_hotels(
        &self,
        city_code: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<SupplierResponse<HotelOffer>, SupplierClientError>;

    async fn search_activities(
        &self,
        city_code: &str,
        date: NaiveDate,
    ) -> Result<SupplierResponse<ActivityOffer>, SupplierClientError>;

    /// Short backend name for health reporting
    fn backend(&self) -> &'static str;
}

fn price(total: &str) -> SupplierPrice {
    SupplierPrice {
        total: total.to_string(),
        currency: "EUR".to_string(),
    }
}

/// Simulated supplier returning fixed offers after a fixed latency
#[derive(Debug, Clone)]
pub struct MockSupplier {
    latency: Duration,
}

impl MockSupplier {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for MockSupplier {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}

#[async_trait]
impl SupplierClient for MockSupplier {
    async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: NaiveDate,
        return_date: Option<NaiveDate>,
    ) -> Result<SupplierResponse<FlightOffer>, SupplierClientError> {
        tracing::info!("Searching flights from {} to {}", origin, destination);
        tokio::time::sleep(self.latency).await;

        let offer = |id: &str, total: &str, seats: u32| FlightOffer {
            id: id.to_string(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_date: departure_date.to_string(),
            return_date: return_date.map(|d| d.to_string()),
            price: price(total),
            available_seats: seats,
        };

        Ok(SupplierResponse {
            data: vec![offer("flight1", "350.42", 12), offer("flight2", "420.10", 5)],
        })
    }

    async fn search_hotels(
        &self,
        city_code: &str,
        _check_in: NaiveDate,
        _check_out: NaiveDate,
    ) -> Result<SupplierResponse<HotelOffer>, SupplierClientError> {
        tracing::info!("Searching hotels in {}", city_code);
        tokio::time::sleep(self.latency).await;

        Ok(SupplierResponse {
            data: vec![
                HotelOffer {
                    hotel_id: "hotel1".to_string(),
                    name: "Grand Hotel".to_string(),
                    city_code: city_code.to_string(),
                    rating: 4.5,
                    price: price("210.00"),
                    amenities: vec!["WIFI".to_string(), "POOL".to_string(), "SPA".to_string()],
                },
                HotelOffer {
                    hotel_id: "hotel2".to_string(),
                    name: "Boutique Residence".to_string(),
                    city_code: city_code.to_string(),
                    rating: 4.2,
                    price: price("175.50"),
                    amenities: vec!["WIFI".to_string(), "BREAKFAST".to_string()],
                },
            ],
        })
    }

    async fn search_activities(
        &self,
        city_code: &str,
        date: NaiveDate,
    ) -> Result<SupplierResponse<ActivityOffer>, SupplierClientError> {
        tracing::info!("Searching activities in {}", city_code);
        tokio::time::sleep(self.latency).await;

        let offer = |id: &str, name: &str, duration: &str, amount: &str, rating: f64| ActivityOffer {
            activity_id: id.to_string(),
            name: name.to_string(),
            city_code: city_code.to_string(),
            duration: duration.to_string(),
            price: ActivityPrice {
                amount: amount.to_string(),
                currency: "EUR".to_string(),
            },
            rating,
            booking_date: date.to_string(),
        };

        Ok(SupplierResponse {
            data: vec![
                offer("activity1", "City Tour", "3:00", "45.00", 4.7),
                offer("activity2", "Museum Visit", "2:30", "22.50", 4.3),
            ],
        })
    }

    fn backend(&self) -> &'static str {
        "mock"
    }
}

/// HTTP client for a live supplier API
///
/// Endpoints live under `{base_url}/v1/shopping/` and answer with a
/// `{ "data": [...] }` envelope.
pub struct HttpSupplier {
    base_url: String,
    api_key: String,
    client: Client,
}

impl HttpSupplier {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, SupplierClientError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        let query: Vec<String> = params
            .iter()
            .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
            .collect();

        format!(
            "{}/v1/shopping/{}?{}",
            self.base_url.trim_end_matches('/'),
            path,
            query.join("&")
        )
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<SupplierResponse<T>, SupplierClientError> {
        tracing::debug!("Supplier request: {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SupplierClientError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| SupplierClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl SupplierClient for HttpSupplier {
    async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: NaiveDate,
        return_date: Option<NaiveDate>,
    ) -> Result<SupplierResponse<FlightOffer>, SupplierClientError> {
        let mut params = vec![
            ("originLocationCode", origin.to_string()),
            ("destinationLocationCode", destination.to_string()),
            ("departureDate", departure_date.to_string()),
        ];
        if let Some(date) = return_date {
            params.push(("returnDate", date.to_string()));
        }

        self.fetch(&self.url("flight-offers", &params)).await
    }

    async fn search_hotels(
        &self,
        city_code: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<SupplierResponse<HotelOffer>, SupplierClientError> {
        let params = [
            ("cityCode", city_code.to_string()),
            ("checkInDate", check_in.to_string()),
            ("checkOutDate", check_out.to_string()),
        ];

        self.fetch(&self.url("hotel-offers", &params)).await
    }

    async fn search_activities(
        &self,
        city_code: &str,
        date: NaiveDate,
    ) -> Result<SupplierResponse<ActivityOffer>, SupplierClientError> {
        let params = [("cityCode", city_code.to_string()), ("date", date.to_string())];

        self.fetch(&self.url("activities", &params)).await
    }

    fn backend(&self) -> &'static str {
        "http"
    }
}

/// Cached search facade over the supplier
///
/// Each search is keyed on all of its parameters and cached for the
/// configured TTL. Concurrent misses on the same key each reach the supplier.
pub struct SupplierService {
    client: Arc<dyn SupplierClient>,
    cache: Arc<CacheManager>,
    ttl: Duration,
}

impl SupplierService {
    pub fn new(client: Arc<dyn SupplierClient>, cache: Arc<CacheManager>, ttl: Duration) -> Self {
        Self { client, cache, ttl }
    }

    pub fn backend(&self) -> &'static str {
        self.client.backend()
    }

    pub async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: NaiveDate,
        return_date: Option<NaiveDate>,
    ) -> Result<SupplierResponse<FlightOffer>, SupplierError> {
        let departure = departure_date.to_string();
        let return_str = return_date.map(|d| d.to_string());
        let key = CacheKey::flights(origin, destination, &departure, return_str.as_deref());

        self.cache
            .get_or_compute(&key, self.ttl, || {
                self.client.search_flights(origin, destination, departure_date, return_date)
            })
            .await
            .map_err(|e| {
                tracing::error!("Error searching flights {} -> {}: {}", origin, destination, e);
                SupplierError::SearchFailed { operation: "flights" }
            })
    }

    pub async fn search_hotels(
        &self,
        city_code: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<SupplierResponse<HotelOffer>, SupplierError> {
        let key = CacheKey::hotels(city_code, &check_in.to_string(), &check_out.to_string());

        self.cache
            .get_or_compute(&key, self.ttl, || {
                self.client.search_hotels(city_code, check_in, check_out)
            })
            .await
            .map_err(|e| {
                tracing::error!("Error searching hotels in {}: {}", city_code, e);
                SupplierError::SearchFailed { operation: "hotels" }
            })
    }

    pub async fn search_activities(
        &self,
        city_code: &str,
        date: NaiveDate,
    ) -> Result<SupplierResponse<ActivityOffer>, SupplierError> {
        let key = CacheKey::activities(city_code, &date.to_string());

        self.cache
            .get_or_compute(&key, self.ttl, || self.client.search_activities(city_code, date))
            .await
            .map_err(|e| {
                tracing::error!("Error searching activities in {}: {}", city_code, e);
                SupplierError::SearchFailed { operation: "activities" }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cache::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_supplier_echoes_query() {
        let supplier = MockSupplier::default();
        let flights = supplier
            .search_flights("CDG", "JFK", date(2025, 7, 15), None)
            .await
            .unwrap();

        assert_eq!(flights.data.len(), 2);
        assert_eq!(flights.data[0].origin, "CDG");
        assert_eq!(flights.data[0].departure_date, "2025-07-15");
        assert!(flights.data[0].return_date.is_none());
    }

    #[tokio::test]
    async fn test_http_supplier_parses_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/shopping/activities")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("cityCode".into(), "PAR".into()),
                mockito::Matcher::UrlEncoded("date".into(), "2025-07-15".into()),
            ]))
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data":[{"activityId":"a1","name":"Louvre","cityCode":"PAR","duration":"2:00","price":{"amount":"17.00","currency":"EUR"},"rating":4.8,"bookingDate":"2025-07-15"}]}"#,
            )
            .create_async()
            .await;

        let supplier = HttpSupplier::new(server.url(), "secret".to_string(), Duration::from_secs(5)).unwrap();
        let activities = supplier.search_activities("PAR", date(2025, 7, 15)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(activities.data.len(), 1);
        assert_eq!(activities.data[0].name, "Louvre");
    }

    #[tokio::test]
    async fn test_http_supplier_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let supplier = HttpSupplier::new(server.url(), "secret".to_string(), Duration::from_secs(5)).unwrap();
        let result = supplier.search_hotels("PAR", date(2025, 7, 15), date(2025, 7, 18)).await;

        assert!(matches!(result, Err(SupplierClientError::Status(503))));
    }

    #[tokio::test]
    async fn test_facade_hides_provider_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = Arc::new(HttpSupplier::new(server.url(), "k".to_string(), Duration::from_secs(5)).unwrap());
        let cache = Arc::new(CacheManager::new(Arc::new(MemoryStore::new(100))));
        let service = SupplierService::new(client, cache, Duration::from_secs(900));

        let err = service
            .search_activities("PAR", date(2025, 7, 15))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to search activities");
    }
}
