use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use crate::models::RecommendationType;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Cache store unavailable: {0}")]
    Unavailable(String),
}

/// Shared key-value store behind the cache-aside layer
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Raw bytes stored under `key`, or `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, expiring `ttl` from now
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    /// Short backend name for health reporting
    fn backend(&self) -> &'static str;
}

/// Redis-backed store shared across service instances
pub struct RedisStore {
    redis: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;
        Ok(Self { redis })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        // Clones share one multiplexed connection
        let mut conn = self.redis.clone();
        let value: Option<Vec<u8>> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.redis.clone();
        let _: () = redis::cmd("SETEX")
            .arg(key)
            .arg(ttl.as_secs().max(1))
            .arg(value)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    bytes: Vec<u8>,
    expires_at: Instant,
}

/// In-process store used when Redis is not configured or unreachable
///
/// Expiry is checked on read against the tokio clock, so each entry keeps the
/// TTL it was written with.
pub struct MemoryStore {
    entries: moka::future::Cache<String, MemoryEntry>,
}

impl MemoryStore {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: moka::future::CacheBuilder::new(max_capacity).build(),
        }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match self.entries.get(key).await {
            Some(entry) if Instant::now() < entry.expires_at => Ok(Some(entry.bytes)),
            Some(_) => {
                self.entries.invalidate(key).await;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let entry = MemoryEntry {
            bytes: value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.insert(key.to_string(), entry).await;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Read-through cache in front of any async computation
///
/// Fails open: when the store cannot be read or holds a malformed entry the
/// value is computed and returned without being cached. Errors from the
/// computation itself are never cached.
pub struct CacheManager {
    store: Arc<dyn CacheStore>,
    hits: AtomicU64,
    misses: AtomicU64,
    store_errors: AtomicU64,
}

impl CacheManager {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            store_errors: AtomicU64::new(0),
        }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Return the cached value for `key`, or compute, cache and return it
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.store.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!("Cache hit for key: {}", key);
                    return Ok(value);
                }
                Err(e) => {
                    self.store_errors.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("Malformed cache entry for key {}: {}", key, e);
                    return compute().await;
                }
            },
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Cache miss for key: {}", key);
            }
            Err(e) => {
                self.store_errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Cache error for key {}: {}", key, e);
                return compute().await;
            }
        }

        let value = compute().await?;

        match serde_json::to_vec(&value) {
            Ok(bytes) => {
                if let Err(e) = self.store.set(key, bytes, ttl).await {
                    self.store_errors.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("Failed to cache key {}: {}", key, e);
                } else {
                    tracing::trace!("Cache set: {} (ttl {}s)", key, ttl.as_secs());
                }
            }
            Err(e) => {
                tracing::warn!("Failed to serialize value for key {}: {}", key, e);
            }
        }

        Ok(value)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            hits,
            misses,
            store_errors: self.store_errors.load(Ordering::Relaxed),
            hit_rate: if lookups > 0 { hits as f64 / lookups as f64 } else { 0.0 },
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub store_errors: u64,
    pub hit_rate: f64,
}

/// Cache key builder
///
/// Every key carries all parameters of the query that produced the value.
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for ranked recommendations
    pub fn recommendations(user_id: &str, kind: RecommendationType, count: usize) -> String {
        format!("recommendations:{}:{}:{}", user_id, kind, count)
    }

    /// Build a cache key for a flight search; one-way trips use a sentinel
    pub fn flights(
        origin: &str,
        destination: &str,
        departure_date: &str,
        return_date: Option<&str>,
    ) -> String {
        format!(
            "flights:{}:{}:{}:{}",
            origin,
            destination,
            departure_date,
            return_date.unwrap_or("one-way")
        )
    }

    /// Build a cache key for a hotel search
    pub fn hotels(city_code: &str, check_in: &str, check_out: &str) -> String {
        format!("hotels:{}:{}:{}", city_code, check_in, check_out)
    }

    /// Build a cache key for an activity search
    pub fn activities(city_code: &str, date: &str) -> String {
        format!("activities:{}:{}", city_code, date)
    }
}
