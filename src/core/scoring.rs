use crate::models::{Activity, Destination, Factor, RelevanceFactor};
use crate::core::filters::count_matching_tags;

/// Score added per candidate tag that matches a preferred travel type
pub const TAG_MATCH_WEIGHT: f64 = 0.2;
/// Multiplier applied to a destination's 0-5 rating
pub const RATING_WEIGHT: f64 = 0.1;
/// Flat bonus for activities with a VR experience
pub const VR_BONUS: f64 = 0.1;

const PREFERENCE_MATCH_WEIGHT: f64 = 0.7;
const POPULARITY_WEIGHT: f64 = 0.2;
const VR_EXPERIENCE_WEIGHT: f64 = 0.2;
const DIVERSITY_WEIGHT: f64 = 0.1;

/// Score a destination against the preferred tags
///
/// score = 0.2 * matching_tags + 0.1 * rating + diversity
///
/// Returns the score and the number of matching tags.
pub fn score_destination(
    destination: &Destination,
    preferred_tags: &[String],
    diversity: f64,
) -> (f64, usize) {
    let matched = count_matching_tags(&destination.tags, preferred_tags);
    let score = matched as f64 * TAG_MATCH_WEIGHT + destination.rating * RATING_WEIGHT + diversity;
    (score, matched)
}

/// Score an activity against the preferred tags
///
/// score = 0.2 * matching_tags + (0.1 if VR) + diversity
pub fn score_activity(
    activity: &Activity,
    preferred_tags: &[String],
    diversity: f64,
) -> (f64, usize) {
    let matched = count_matching_tags(&activity.tags, preferred_tags);
    let vr_bonus = if activity.vr_available { VR_BONUS } else { 0.0 };
    let score = matched as f64 * TAG_MATCH_WEIGHT + vr_bonus + diversity;
    (score, matched)
}

fn preference_match(matched: usize) -> RelevanceFactor {
    RelevanceFactor {
        factor: Factor::PreferenceMatch,
        weight: if matched > 0 { PREFERENCE_MATCH_WEIGHT } else { 0.0 },
    }
}

pub fn destination_factors(matched: usize) -> Vec<RelevanceFactor> {
    vec![
        preference_match(matched),
        RelevanceFactor { factor: Factor::Popularity, weight: POPULARITY_WEIGHT },
        RelevanceFactor { factor: Factor::Diversity, weight: DIVERSITY_WEIGHT },
    ]
}

pub fn activity_factors(matched: usize, vr_available: bool) -> Vec<RelevanceFactor> {
    vec![
        preference_match(matched),
        RelevanceFactor {
            factor: Factor::VrExperience,
            weight: if vr_available { VR_EXPERIENCE_WEIGHT } else { 0.0 },
        },
        RelevanceFactor { factor: Factor::Diversity, weight: DIVERSITY_WEIGHT },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn create_destination(tag_values: &[&str], rating: f64) -> Destination {
        Destination {
            id: "dest".to_string(),
            name: "Test".to_string(),
            country: "Test".to_string(),
            description: None,
            tags: tags(tag_values),
            rating,
            vr_available: false,
        }
    }

    #[test]
    fn test_destination_score() {
        let destination = create_destination(&["adventure", "nature"], 4.0);
        let (score, matched) = score_destination(&destination, &tags(&["adventure", "nature"]), 0.0);

        assert_eq!(matched, 2);
        assert!((score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_destination_score_includes_diversity() {
        let destination = create_destination(&[], 5.0);
        let (score, matched) = score_destination(&destination, &tags(&["adventure"]), 0.05);

        assert_eq!(matched, 0);
        assert!((score - 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_activity_vr_bonus() {
        let mut activity = Activity {
            id: "act".to_string(),
            title: "Tour".to_string(),
            description: None,
            destination_id: None,
            tags: tags(&["culture"]),
            price: Money { amount: 45.0, currency: "EUR".to_string() },
            duration_minutes: Some(180),
            vr_available: true,
        };

        let (with_vr, _) = score_activity(&activity, &tags(&["culture"]), 0.0);
        activity.vr_available = false;
        let (without_vr, _) = score_activity(&activity, &tags(&["culture"]), 0.0);

        assert!((with_vr - 0.3).abs() < 1e-9);
        assert!((without_vr - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_relevance_factors() {
        let factors = destination_factors(0);
        assert_eq!(factors[0].factor, Factor::PreferenceMatch);
        assert_eq!(factors[0].weight, 0.0);
        assert_eq!(factors[1].factor, Factor::Popularity);
        assert_eq!(factors[2].weight, 0.1);

        let factors = activity_factors(3, true);
        assert_eq!(factors[0].weight, 0.7);
        assert_eq!(factors[1].factor, Factor::VrExperience);
        assert_eq!(factors[1].weight, 0.2);
    }
}
