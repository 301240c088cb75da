use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::core::Ranker;
use crate::models::{
    Activity, Destination, RecommendationItems, RecommendationResult, RecommendationType,
    ScoredCandidate, UserPreferences,
};
use crate::services::cache::{CacheKey, CacheManager};
use crate::services::store::{CandidateStore, StoreError, UserStore};

/// Errors returned by the recommendation service
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("User not found: {0}")]
    NotFound(String),

    /// Any unexpected failure while generating recommendations
    #[error("Failed to generate recommendations")]
    AiService(#[from] StoreError),
}

/// Settings for the recommendation service
#[derive(Debug, Clone, Copy)]
pub struct RecommendationOptions {
    /// How long a ranked list stays in the cache
    pub cache_ttl: Duration,
    /// Validity advertised on the returned envelope
    pub envelope_ttl: chrono::Duration,
}

impl Default for RecommendationOptions {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(30 * 60),
            envelope_ttl: chrono::Duration::hours(24),
        }
    }
}

/// Resolves preferences, pulls a candidate pool, ranks it and caches the
/// ranked list per (user, type, count).
pub struct RecommendationService {
    users: Arc<dyn UserStore>,
    candidates: Arc<dyn CandidateStore>,
    cache: Arc<CacheManager>,
    ranker: Ranker,
    options: RecommendationOptions,
}

impl RecommendationService {
    pub fn new(
        users: Arc<dyn UserStore>,
        candidates: Arc<dyn CandidateStore>,
        cache: Arc<CacheManager>,
        ranker: Ranker,
        options: RecommendationOptions,
    ) -> Self {
        Self {
            users,
            candidates,
            cache,
            ranker,
            options,
        }
    }

    pub fn catalog_backend(&self) -> &'static str {
        self.candidates.backend()
    }

    pub async fn catalog_healthy(&self) -> bool {
        self.candidates.health_check().await
    }

    /// Ranked recommendations for a user, wrapped in a fresh envelope
    pub async fn get_recommendations(
        &self,
        user_id: &str,
        kind: RecommendationType,
        count: usize,
    ) -> Result<RecommendationResult, RecommendationError> {
        let key = CacheKey::recommendations(user_id, kind, count);
        let ttl = self.options.cache_ttl;

        let items = match kind {
            RecommendationType::Destination => self
                .cache
                .get_or_compute(&key, ttl, || self.rank_destinations(user_id, count))
                .await
                .map(RecommendationItems::Destinations),
            RecommendationType::Activity => self
                .cache
                .get_or_compute(&key, ttl, || self.rank_activities(user_id, count))
                .await
                .map(RecommendationItems::Activities),
        }
        .map_err(|e| {
            tracing::error!("Error getting recommendations for {}: {:?}", user_id, e);
            e
        })?;

        let timestamp = Utc::now();

        Ok(RecommendationResult {
            recommendation_id: format!("rec-{}", uuid::Uuid::new_v4()),
            user_id: user_id.to_string(),
            kind,
            items,
            timestamp,
            expires_at: timestamp + self.options.envelope_ttl,
        })
    }

    /// Stored preferences, or the defaults when the user has none
    async fn load_preferences(&self, user_id: &str) -> Result<UserPreferences, RecommendationError> {
        let user = self
            .users
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| RecommendationError::NotFound(user_id.to_string()))?;

        Ok(user.preferences.unwrap_or_default())
    }

    async fn rank_destinations(
        &self,
        user_id: &str,
        count: usize,
    ) -> Result<Vec<ScoredCandidate<Destination>>, RecommendationError> {
        let preferences = self.load_preferences(user_id).await?;
        let filter = self.ranker.destination_filter(&preferences);

        let pool = self
            .candidates
            .find_destinations(&filter, Ranker::pool_size(count))
            .await?;

        tracing::debug!("Ranking {} destinations for {}", pool.len(), user_id);
        Ok(self.ranker.rank_destinations(&preferences, pool, count))
    }

    async fn rank_activities(
        &self,
        user_id: &str,
        count: usize,
    ) -> Result<Vec<ScoredCandidate<Activity>>, RecommendationError> {
        let preferences = self.load_preferences(user_id).await?;
        let filter = self.ranker.activity_filter(&preferences);

        let pool = self
            .candidates
            .find_activities(&filter, Ranker::pool_size(count))
            .await?;

        tracing::debug!("Ranking {} activities for {}", pool.len(), user_id);
        Ok(self.ranker.rank_activities(&preferences, pool, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cache::MemoryStore;
    use crate::services::catalog::InMemoryCatalog;

    fn service(catalog: InMemoryCatalog) -> RecommendationService {
        let catalog = Arc::new(catalog);
        RecommendationService::new(
            catalog.clone(),
            catalog,
            Arc::new(CacheManager::new(Arc::new(MemoryStore::new(100)))),
            Ranker::deterministic(),
            RecommendationOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_envelope_expiry() {
        let service = service(InMemoryCatalog::seeded());

        let result = service
            .get_recommendations("user-john", RecommendationType::Destination, 3)
            .await
            .unwrap();

        assert!(result.recommendation_id.starts_with("rec-"));
        assert_eq!(result.expires_at - result.timestamp, chrono::Duration::hours(24));
        assert!(result.items.len() <= 3);
    }

    #[tokio::test]
    async fn test_unknown_user_not_found() {
        let service = service(InMemoryCatalog::seeded());

        let err = service
            .get_recommendations("ghost", RecommendationType::Activity, 5)
            .await
            .unwrap_err();

        assert!(matches!(err, RecommendationError::NotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_activity_recommendations_for_seeded_user() {
        let service = service(InMemoryCatalog::seeded());

        let result = service
            .get_recommendations("user-jane", RecommendationType::Activity, 5)
            .await
            .unwrap();

        let RecommendationItems::Activities(items) = result.items else {
            panic!("expected activities");
        };

        // Budget 5000 -> ceiling 500: the spa retreat matches two tags and wins
        assert_eq!(items[0].candidate.id, "act-maldives-spa");
        assert!((items[0].score - 0.4).abs() < 1e-9);
    }
}
