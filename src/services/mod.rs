// Service exports
pub mod auth;
pub mod cache;
pub mod catalog;
pub mod postgres;
pub mod recommendations;
pub mod store;
pub mod supplier;

pub use auth::{Claims, JwtValidator};
pub use cache::{CacheError, CacheKey, CacheManager, CacheStats, CacheStore, MemoryStore, RedisStore};
pub use catalog::InMemoryCatalog;
pub use postgres::{PostgresClient, PostgresError};
pub use recommendations::{RecommendationError, RecommendationOptions, RecommendationService};
pub use store::{CandidateStore, StoreError, UserStore};
pub use supplier::{
    HttpSupplier, MockSupplier, SupplierClient, SupplierClientError, SupplierError, SupplierService,
};
