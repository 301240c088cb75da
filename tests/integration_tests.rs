// Integration tests for the travel recommendation service

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use travel_reco::core::Ranker;
use travel_reco::models::{
    ActivityOffer, Destination, FlightOffer, HotelOffer, RecommendationItems, RecommendationType,
    SupplierResponse, UserRecord,
};
use travel_reco::services::{
    CacheError, CacheManager, CacheStore, InMemoryCatalog, MemoryStore, MockSupplier,
    PostgresError, RecommendationError, RecommendationOptions, RecommendationService, StoreError,
    SupplierClient, SupplierClientError, SupplierError, SupplierService, UserStore,
};

/// Store whose every operation fails, as when Redis is down
struct FailingStore;

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// Store that reads fine but rejects every write
struct ReadOnlyStore;

#[async_trait]
impl CacheStore for ReadOnlyStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("read-only replica".to_string()))
    }

    fn backend(&self) -> &'static str {
        "read-only"
    }
}

/// Profile store whose database is unreachable
struct UnreachableUsers;

#[async_trait]
impl UserStore for UnreachableUsers {
    async fn find_user_by_id(&self, _id: &str) -> Result<Option<UserRecord>, StoreError> {
        Err(PostgresError::from(sqlx::Error::PoolTimedOut).into())
    }
}

/// Supplier that counts upstream calls and optionally fails them
struct CountingSupplier {
    inner: MockSupplier,
    calls: AtomicUsize,
    fail: bool,
}

impl CountingSupplier {
    fn new(fail: bool) -> Self {
        Self {
            inner: MockSupplier::new(Duration::ZERO),
            calls: AtomicUsize::new(0),
            fail,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) -> Result<(), SupplierClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SupplierClientError::Status(500));
        }
        Ok(())
    }
}

#[async_trait]
impl SupplierClient for CountingSupplier {
    async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: NaiveDate,
        return_date: Option<NaiveDate>,
    ) -> Result<SupplierResponse<FlightOffer>, SupplierClientError> {
        self.record()?;
        self.inner.search_flights(origin, destination, departure_date, return_date).await
    }

    async fn search_hotels(
        &self,
        city_code: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<SupplierResponse<HotelOffer>, SupplierClientError> {
        self.record()?;
        self.inner.search_hotels(city_code, check_in, check_out).await
    }

    async fn search_activities(
        &self,
        city_code: &str,
        date: NaiveDate,
    ) -> Result<SupplierResponse<ActivityOffer>, SupplierClientError> {
        self.record()?;
        self.inner.search_activities(city_code, date).await
    }

    fn backend(&self) -> &'static str {
        "counting"
    }
}

fn create_test_cache() -> Arc<CacheManager> {
    Arc::new(CacheManager::new(Arc::new(MemoryStore::new(1000))))
}

fn create_test_service(catalog: InMemoryCatalog, cache: Arc<CacheManager>) -> RecommendationService {
    let catalog = Arc::new(catalog);
    RecommendationService::new(
        catalog.clone(),
        catalog,
        cache,
        Ranker::deterministic(),
        RecommendationOptions::default(),
    )
}

fn create_test_destination(id: &str, tags: &[&str], rating: f64) -> Destination {
    Destination {
        id: id.to_string(),
        name: id.to_string(),
        country: "Nowhere".to_string(),
        description: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        rating,
        vr_available: false,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_compute_runs_once_within_ttl() {
    let cache = create_test_cache();
    let calls = AtomicUsize::new(0);
    let ttl = Duration::from_secs(60);

    for _ in 0..3 {
        let value: Result<String, CacheError> = cache
            .get_or_compute("k", ttl, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("v".to_string())
            })
            .await;
        assert_eq!(value.unwrap(), "v");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Past the TTL the value is recomputed
    tokio::time::advance(Duration::from_secs(61)).await;

    let value: Result<String, CacheError> = cache
        .get_or_compute("k", ttl, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok("v2".to_string())
        })
        .await;
    assert_eq!(value.unwrap(), "v2");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_cache_fails_open_when_store_is_down() {
    let cache = CacheManager::new(Arc::new(FailingStore));
    let calls = AtomicUsize::new(0);

    for _ in 0..2 {
        let value: Result<u32, CacheError> = cache
            .get_or_compute("k", Duration::from_secs(60), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;
        assert_eq!(value.unwrap(), 7);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.stats().store_errors, 2);
    assert_eq!(cache.backend(), "failing");
}

#[tokio::test]
async fn test_recommendations_survive_cache_outage() {
    let service = create_test_service(
        InMemoryCatalog::seeded(),
        Arc::new(CacheManager::new(Arc::new(FailingStore))),
    );

    let result = service
        .get_recommendations("user-john", RecommendationType::Destination, 2)
        .await
        .unwrap();

    assert_eq!(result.items.len(), 2);
}

#[tokio::test]
async fn test_destination_ranking_is_deterministic() {
    let service = create_test_service(InMemoryCatalog::seeded(), create_test_cache());

    let result = service
        .get_recommendations("user-john", RecommendationType::Destination, 5)
        .await
        .unwrap();

    let RecommendationItems::Destinations(items) = result.items else {
        panic!("expected destinations");
    };

    let ids: Vec<&str> = items.iter().map(|i| i.candidate.id.as_str()).collect();
    // Paris: cultural + 4.8; Queenstown: adventure + 4.4; the rest on rating alone
    assert_eq!(ids, vec!["dest-paris", "dest-queenstown", "dest-barcelona", "dest-maldives"]);
    assert!((items[0].score - 0.68).abs() < 1e-9);
    assert!(items.windows(2).all(|w| w[0].score >= w[1].score));
}

#[tokio::test]
async fn test_activities_respect_budget_share() {
    let service = create_test_service(InMemoryCatalog::seeded(), create_test_cache());

    let result = service
        .get_recommendations("user-john", RecommendationType::Activity, 5)
        .await
        .unwrap();

    let RecommendationItems::Activities(items) = result.items else {
        panic!("expected activities");
    };

    // Budget 3000 allows activities up to 300
    assert!(items.iter().all(|i| i.candidate.price.amount <= 300.0));
    assert_eq!(items[0].candidate.id, "act-queenstown-bungee");
    assert!(!items.iter().any(|i| i.candidate.id == "act-maldives-spa"));
}

#[tokio::test]
async fn test_count_truncates_and_is_part_of_cache_key() {
    let cache = create_test_cache();
    let service = create_test_service(InMemoryCatalog::seeded(), cache.clone());

    let two = service
        .get_recommendations("user-john", RecommendationType::Destination, 2)
        .await
        .unwrap();
    let three = service
        .get_recommendations("user-john", RecommendationType::Destination, 3)
        .await
        .unwrap();

    assert_eq!(two.items.len(), 2);
    assert_eq!(three.items.len(), 3);
    assert_eq!(cache.stats().hits, 0);

    let again = service
        .get_recommendations("user-john", RecommendationType::Destination, 2)
        .await
        .unwrap();
    let ids = |items: &RecommendationItems| match items {
        RecommendationItems::Destinations(items) => {
            items.iter().map(|i| i.candidate.id.clone()).collect::<Vec<_>>()
        }
        RecommendationItems::Activities(items) => {
            items.iter().map(|i| i.candidate.id.clone()).collect::<Vec<_>>()
        }
    };
    assert_eq!(ids(&again.items), ids(&two.items));
    assert_ne!(again.recommendation_id, two.recommendation_id);
    assert_eq!(cache.stats().hits, 1);
}

#[tokio::test]
async fn test_user_without_preferences_gets_popular_destinations() {
    let catalog = InMemoryCatalog::new()
        .with_user("user-new", None)
        .with_destination(create_test_destination("dest-popular", &["beach"], 4.9))
        .with_destination(create_test_destination("dest-quiet", &["nature"], 3.2));
    let service = create_test_service(catalog, create_test_cache());

    let result = service
        .get_recommendations("user-new", RecommendationType::Destination, 5)
        .await
        .unwrap();

    let RecommendationItems::Destinations(items) = result.items else {
        panic!("expected destinations");
    };

    // No preferred tags: only the rating floor admits candidates
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].candidate.id, "dest-popular");
}

#[tokio::test]
async fn test_empty_catalog_returns_empty_list() {
    let catalog = InMemoryCatalog::new().with_user("user-new", None);
    let service = create_test_service(catalog, create_test_cache());

    let result = service
        .get_recommendations("user-new", RecommendationType::Activity, 5)
        .await
        .unwrap();

    assert!(result.items.is_empty());
}

#[tokio::test]
async fn test_unknown_user_is_not_cached() {
    let cache = create_test_cache();
    let service = create_test_service(InMemoryCatalog::seeded(), cache.clone());

    for _ in 0..2 {
        let err = service
            .get_recommendations("ghost", RecommendationType::Destination, 5)
            .await
            .unwrap_err();
        assert!(matches!(err, RecommendationError::NotFound(_)));
    }

    let stats = cache.stats();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 2);
}

#[tokio::test]
async fn test_flight_search_hits_supplier_once() {
    let client = Arc::new(CountingSupplier::new(false));
    let supplier = SupplierService::new(client.clone(), create_test_cache(), Duration::from_secs(900));

    let first = supplier
        .search_flights("CDG", "JFK", date(2025, 7, 15), None)
        .await
        .unwrap();
    let second = supplier
        .search_flights("CDG", "JFK", date(2025, 7, 15), None)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(client.calls(), 1);

    // A return date is a different query
    supplier
        .search_flights("CDG", "JFK", date(2025, 7, 15), Some(date(2025, 7, 22)))
        .await
        .unwrap();
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn test_hotel_and_activity_searches_are_cached_per_query() {
    let client = Arc::new(CountingSupplier::new(false));
    let supplier = SupplierService::new(client.clone(), create_test_cache(), Duration::from_secs(900));

    for _ in 0..2 {
        supplier.search_hotels("PAR", date(2025, 7, 15), date(2025, 7, 18)).await.unwrap();
        supplier.search_activities("PAR", date(2025, 7, 15)).await.unwrap();
    }
    assert_eq!(client.calls(), 2);

    supplier.search_activities("BCN", date(2025, 7, 15)).await.unwrap();
    assert_eq!(client.calls(), 3);
}

#[tokio::test]
async fn test_supplier_failure_is_uniform_and_not_cached() {
    let client = Arc::new(CountingSupplier::new(true));
    let supplier = SupplierService::new(client.clone(), create_test_cache(), Duration::from_secs(900));

    for _ in 0..2 {
        let err = supplier
            .search_hotels("PAR", date(2025, 7, 15), date(2025, 7, 18))
            .await
            .unwrap_err();
        assert!(matches!(err, SupplierError::SearchFailed { operation: "hotels" }));
        assert_eq!(err.to_string(), "Failed to search hotels");
    }

    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn test_value_returned_when_cache_write_fails() {
    let cache = CacheManager::new(Arc::new(ReadOnlyStore));
    let calls = AtomicUsize::new(0);

    for _ in 0..2 {
        let value: Result<u32, CacheError> = cache
            .get_or_compute("k", Duration::from_secs(60), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(11)
            })
            .await;
        assert_eq!(value.unwrap(), 11);
    }

    // Nothing was stored, so every call recomputes
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let stats = cache.stats();
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.store_errors, 2);
}

#[tokio::test]
async fn test_store_failure_surfaces_as_ai_service_error() {
    let store = Arc::new(MemoryStore::new(100));
    let cache = Arc::new(CacheManager::new(store.clone()));
    let service = RecommendationService::new(
        Arc::new(UnreachableUsers),
        Arc::new(InMemoryCatalog::seeded()),
        cache.clone(),
        Ranker::deterministic(),
        RecommendationOptions::default(),
    );

    let err = service
        .get_recommendations("user-john", RecommendationType::Destination, 5)
        .await
        .unwrap_err();

    assert!(matches!(err, RecommendationError::AiService(_)));
    assert_eq!(err.to_string(), "Failed to generate recommendations");

    let key = travel_reco::services::CacheKey::recommendations("user-john", RecommendationType::Destination, 5);
    assert!(store.get(&key).await.unwrap().is_none());
}
