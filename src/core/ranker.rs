use std::sync::Arc;

use crate::core::{
    diversity::{DiversitySource, FixedDiversity, SeededDiversity},
    filters::{activity_filter, destination_filter, matches_activity_filter, matches_destination_filter},
    scoring::{activity_factors, destination_factors, score_activity, score_destination},
};
use crate::models::{Activity, ActivityFilter, Destination, DestinationFilter, ScoredCandidate, UserPreferences};

/// Preference-based ranker for destinations and activities
///
/// # Pipeline
/// 1. Pool filter (re-applied to whatever the store returned)
/// 2. Tag/rating/VR scoring plus a diversity term
/// 3. Sort by score, descending
/// 4. Truncate to the requested count
#[derive(Debug, Clone)]
pub struct Ranker {
    diversity: Arc<dyn DiversitySource>,
}

impl Ranker {
    pub fn new(diversity: Arc<dyn DiversitySource>) -> Self {
        Self { diversity }
    }

    /// Ranker with a seeded RNG, or an entropy-seeded one when `seed` is `None`
    pub fn with_seed(seed: Option<u64>) -> Self {
        let source = match seed {
            Some(seed) => SeededDiversity::seeded(seed),
            None => SeededDiversity::from_entropy(),
        };
        Self::new(Arc::new(source))
    }

    /// Ranker whose diversity term is always zero
    pub fn deterministic() -> Self {
        Self::new(Arc::new(FixedDiversity::default()))
    }

    /// Number of candidates to pull from the store for `count` results
    pub fn pool_size(count: usize) -> usize {
        count.saturating_mul(2)
    }

    pub fn destination_filter(&self, preferences: &UserPreferences) -> DestinationFilter {
        destination_filter(preferences)
    }

    pub fn activity_filter(&self, preferences: &UserPreferences) -> ActivityFilter {
        activity_filter(preferences)
    }

    pub fn rank_destinations(
        &self,
        preferences: &UserPreferences,
        pool: Vec<Destination>,
        count: usize,
    ) -> Vec<ScoredCandidate<Destination>> {
        let filter = destination_filter(preferences);

        let mut scored: Vec<ScoredCandidate<Destination>> = pool
            .into_iter()
            .filter(|destination| matches_destination_filter(destination, &filter))
            .map(|destination| {
                let (score, matched) =
                    score_destination(&destination, &filter.tags, self.diversity.sample());
                ScoredCandidate {
                    candidate: destination,
                    score,
                    relevance_factors: destination_factors(matched),
                }
            })
            .collect();

        sort_and_truncate(&mut scored, count);
        scored
    }

    pub fn rank_activities(
        &self,
        preferences: &UserPreferences,
        pool: Vec<Activity>,
        count: usize,
    ) -> Vec<ScoredCandidate<Activity>> {
        let filter = activity_filter(preferences);

        let mut scored: Vec<ScoredCandidate<Activity>> = pool
            .into_iter()
            .filter(|activity| matches_activity_filter(activity, &filter))
            .map(|activity| {
                let (score, matched) =
                    score_activity(&activity, &filter.tags, self.diversity.sample());
                let vr_available = activity.vr_available;
                ScoredCandidate {
                    candidate: activity,
                    score,
                    relevance_factors: activity_factors(matched, vr_available),
                }
            })
            .collect();

        sort_and_truncate(&mut scored, count);
        scored
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_seed(None)
    }
}

/// Drops unscorable (NaN) candidates, then sorts descending under a total order
fn sort_and_truncate<T>(scored: &mut Vec<ScoredCandidate<T>>, count: usize) {
    scored.retain(|candidate| !candidate.score.is_nan());
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(count);
}
