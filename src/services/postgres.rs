use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    Activity, ActivityFilter, Destination, DestinationFilter, Money, UserPreferences, UserRecord,
};
use crate::services::store::{CandidateStore, StoreError, UserStore};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// PostgreSQL client for user profiles and the travel catalog
///
/// Tables: `users` (id, preferences JSONB), `destinations`, `activities`.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
        run_migrations: bool,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        let client = Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await?;

        if run_migrations {
            sqlx::migrate!("./migrations").run(&client.pool).await?;
            tracing::info!("Database migrations applied");
        }

        Ok(client)
    }

    /// Health check for the database connection
    pub async fn ping(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn destination_from_row(row: &PgRow) -> Result<Destination, sqlx::Error> {
    Ok(Destination {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        country: row.try_get("country")?,
        description: row.try_get("description")?,
        tags: row.try_get("tags")?,
        rating: row.try_get("rating")?,
        vr_available: row.try_get("vr_available")?,
    })
}

fn activity_from_row(row: &PgRow) -> Result<Activity, sqlx::Error> {
    let duration: Option<i32> = row.try_get("duration_minutes")?;

    Ok(Activity {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        destination_id: row.try_get("destination_id")?,
        tags: row.try_get("tags")?,
        price: Money {
            amount: row.try_get("price_amount")?,
            currency: row.try_get("price_currency")?,
        },
        duration_minutes: duration.and_then(|m| u32::try_from(m).ok()),
        vr_available: row.try_get("vr_available")?,
    })
}

#[async_trait]
impl UserStore for PostgresClient {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let query = r#"
            SELECT id, preferences
            FROM users
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(PostgresError::from)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let preferences: Option<Json<UserPreferences>> =
            row.try_get("preferences").map_err(PostgresError::from)?;

        Ok(Some(UserRecord {
            id: row.try_get("id").map_err(PostgresError::from)?,
            preferences: preferences.map(|Json(p)| p),
        }))
    }
}

#[async_trait]
impl CandidateStore for PostgresClient {
    async fn find_destinations(
        &self,
        filter: &DestinationFilter,
        limit: usize,
    ) -> Result<Vec<Destination>, StoreError> {
        let query = r#"
            SELECT id, name, country, description, tags, rating, vr_available
            FROM destinations
            WHERE tags && $1 OR rating >= $2
            LIMIT $3
        "#;

        let rows = sqlx::query(query)
            .bind(&filter.tags)
            .bind(filter.min_rating)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(PostgresError::from)?;

        let destinations = rows
            .iter()
            .map(destination_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PostgresError::from)?;

        tracing::debug!("Fetched {} destinations (limit {})", destinations.len(), limit);
        Ok(destinations)
    }

    async fn find_activities(
        &self,
        filter: &ActivityFilter,
        limit: usize,
    ) -> Result<Vec<Activity>, StoreError> {
        let query = r#"
            SELECT id, title, description, destination_id, tags,
                   price_amount, price_currency, duration_minutes, vr_available
            FROM activities
            WHERE (tags && $1 OR ($2 AND vr_available))
              AND price_amount <= $3
            LIMIT $4
        "#;

        let rows = sqlx::query(query)
            .bind(&filter.tags)
            .bind(filter.include_vr)
            .bind(filter.max_price)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(PostgresError::from)?;

        let activities = rows
            .iter()
            .map(activity_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PostgresError::from)?;

        tracing::debug!("Fetched {} activities (limit {})", activities.len(), limit);
        Ok(activities)
    }

    async fn health_check(&self) -> bool {
        self.ping().await.unwrap_or(false)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
