use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Activity, ActivityFilter, Destination, DestinationFilter, UserRecord};
use crate::services::postgres::PostgresError;

/// Errors raised by the profile and candidate stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Postgres(#[from] PostgresError),
}

/// Read access to user profiles
#[async_trait]
pub trait UserStore: Send + Sync {
    /// The user with `id`, or `None` when no such user exists
    async fn find_user_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError>;
}

/// Read access to the destination and activity catalog
#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn find_destinations(
        &self,
        filter: &DestinationFilter,
        limit: usize,
    ) -> Result<Vec<Destination>, StoreError>;

    async fn find_activities(
        &self,
        filter: &ActivityFilter,
        limit: usize,
    ) -> Result<Vec<Activity>, StoreError>;

    /// Whether the backing store is reachable
    async fn health_check(&self) -> bool {
        true
    }

    /// Short backend name for health reporting
    fn backend(&self) -> &'static str;
}
