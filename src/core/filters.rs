use crate::models::{Activity, ActivityFilter, Destination, DestinationFilter, UserPreferences};

/// Rating at which a destination counts as popular regardless of preferences
pub const POPULAR_RATING_FLOOR: f64 = 4.5;

/// A single activity may take at most this fraction (1/n) of the trip budget
pub const ACTIVITY_BUDGET_DIVISOR: f64 = 10.0;

/// Build the destination pool query for a user
///
/// Pool = destinations tagged with one of the user's travel types, plus
/// popular destinations.
pub fn destination_filter(preferences: &UserPreferences) -> DestinationFilter {
    DestinationFilter {
        tags: preferences.preferred_tags(),
        min_rating: POPULAR_RATING_FLOOR,
    }
}

/// Build the activity pool query for a user
///
/// Pool = activities tagged with one of the user's travel types or with a VR
/// experience, restricted to a tenth of the trip budget.
pub fn activity_filter(preferences: &UserPreferences) -> ActivityFilter {
    ActivityFilter {
        tags: preferences.preferred_tags(),
        include_vr: true,
        max_price: preferences.budget_max() / ACTIVITY_BUDGET_DIVISOR,
    }
}

/// Number of candidate tags found in the preferred tag set
#[inline]
pub fn count_matching_tags(candidate_tags: &[String], preferred_tags: &[String]) -> usize {
    candidate_tags
        .iter()
        .filter(|tag| preferred_tags.contains(tag))
        .count()
}

#[inline]
pub fn matches_destination_filter(destination: &Destination, filter: &DestinationFilter) -> bool {
    count_matching_tags(&destination.tags, &filter.tags) > 0
        || destination.rating >= filter.min_rating
}

#[inline]
pub fn matches_activity_filter(activity: &Activity, filter: &ActivityFilter) -> bool {
    if activity.price.amount > filter.max_price {
        return false;
    }

    count_matching_tags(&activity.tags, &filter.tags) > 0
        || (filter.include_vr && activity.vr_available)
}
