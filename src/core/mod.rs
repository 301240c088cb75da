// Core algorithm exports
pub mod diversity;
pub mod filters;
pub mod ranker;
pub mod scoring;

pub use diversity::{DiversitySource, FixedDiversity, SeededDiversity, MAX_DIVERSITY};
pub use filters::{activity_filter, destination_filter, matches_activity_filter, matches_destination_filter};
pub use ranker::Ranker;
pub use scoring::{score_activity, score_destination};
