//! Travel Reco - travel recommendation and supplier search service
//!
//! Ranks destinations and activities against a user's stated preferences and
//! fronts a flight/hotel/activity supplier, with a read-through cache over both.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{DiversitySource, FixedDiversity, Ranker, SeededDiversity};
pub use models::{
    Activity, Destination, RecommendationItems, RecommendationResult, RecommendationType,
    ScoredCandidate, UserPreferences,
};
pub use services::{CacheManager, RecommendationService, SupplierService};
