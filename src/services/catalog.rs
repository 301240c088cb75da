use async_trait::async_trait;
use std::collections::HashMap;

use crate::core::{matches_activity_filter, matches_destination_filter};
use crate::models::{
    AccommodationType, Activity, ActivityFilter, BudgetRange, Destination, DestinationFilter,
    Money, TravelType, UserPreferences, UserRecord,
};
use crate::services::store::{CandidateStore, StoreError, UserStore};

/// In-memory users and catalog
///
/// Used for local development without PostgreSQL and by the test suites.
/// Contents are fixed once built.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    users: HashMap<String, UserRecord>,
    destinations: Vec<Destination>,
    activities: Vec<Activity>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: &str, preferences: Option<UserPreferences>) -> Self {
        self.users.insert(
            id.to_string(),
            UserRecord {
                id: id.to_string(),
                preferences,
            },
        );
        self
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destinations.push(destination);
        self
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }

    /// Catalog with the platform's sample users, destinations and activities
    pub fn seeded() -> Self {
        Self::new()
            .with_user(
                "user-john",
                Some(UserPreferences {
                    travel_types: vec![TravelType::Adventure, TravelType::Cultural],
                    budget_range: Some(BudgetRange { min: 500.0, max: 3000.0, currency: "EUR".to_string() }),
                    preferred_accommodations: vec![AccommodationType::Hotel, AccommodationType::Boutique],
                }),
            )
            .with_user(
                "user-jane",
                Some(UserPreferences {
                    travel_types: vec![TravelType::Luxury, TravelType::Relax],
                    budget_range: Some(BudgetRange { min: 1000.0, max: 5000.0, currency: "EUR".to_string() }),
                    preferred_accommodations: vec![AccommodationType::Resort, AccommodationType::Spa],
                }),
            )
            .with_destination(seed_destination(
                "dest-paris",
                "Paris",
                "France",
                "The City of Light, known for its architecture, art museums, historical monuments, and cuisine.",
                &["romantic", "cultural", "historic"],
                4.8,
            ))
            .with_destination(seed_destination(
                "dest-barcelona",
                "Barcelona",
                "Spain",
                "A vibrant city known for its distinctive architecture, art, and Mediterranean beaches.",
                &["beach", "architecture", "food"],
                4.7,
            ))
            .with_destination(seed_destination(
                "dest-queenstown",
                "Queenstown",
                "New Zealand",
                "Alpine resort town and the birthplace of commercial bungee jumping.",
                &["adventure", "nature", "mountains"],
                4.4,
            ))
            .with_destination(seed_destination(
                "dest-maldives",
                "Maldives",
                "Maldives",
                "Overwater villas, coral reefs and white-sand atolls.",
                &["luxury", "relax", "beach"],
                4.6,
            ))
            .with_activity(seed_activity(
                "act-paris-tour",
                "Paris City Tour",
                "dest-paris",
                &["tour", "sightseeing", "culture"],
                45.0,
                180,
                true,
            ))
            .with_activity(seed_activity(
                "act-barcelona-sagrada",
                "Sagrada Familia Guided Tour",
                "dest-barcelona",
                &["architecture", "guided-tour", "culture"],
                35.0,
                120,
                true,
            ))
            .with_activity(seed_activity(
                "act-queenstown-bungee",
                "Kawarau Bridge Bungee",
                "dest-queenstown",
                &["adventure", "extreme"],
                210.0,
                90,
                false,
            ))
            .with_activity(seed_activity(
                "act-maldives-spa",
                "Overwater Spa Retreat",
                "dest-maldives",
                &["relax", "luxury", "wellness"],
                320.0,
                150,
                false,
            ))
    }
}

fn seed_destination(
    id: &str,
    name: &str,
    country: &str,
    description: &str,
    tags: &[&str],
    rating: f64,
) -> Destination {
    Destination {
        id: id.to_string(),
        name: name.to_string(),
        country: country.to_string(),
        description: Some(description.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        rating,
        vr_available: true,
    }
}

fn seed_activity(
    id: &str,
    title: &str,
    destination_id: &str,
    tags: &[&str],
    amount: f64,
    duration_minutes: u32,
    vr_available: bool,
) -> Activity {
    Activity {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        destination_id: Some(destination_id.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        price: Money { amount, currency: "EUR".to_string() },
        duration_minutes: Some(duration_minutes),
        vr_available,
    }
}

#[async_trait]
impl UserStore for InMemoryCatalog {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.get(id).cloned())
    }
}

#[async_trait]
impl CandidateStore for InMemoryCatalog {
    async fn find_destinations(
        &self,
        filter: &DestinationFilter,
        limit: usize,
    ) -> Result<Vec<Destination>, StoreError> {
        Ok(self
            .destinations
            .iter()
            .filter(|d| matches_destination_filter(d, filter))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_activities(
        &self,
        filter: &ActivityFilter,
        limit: usize,
    ) -> Result<Vec<Activity>, StoreError> {
        Ok(self
            .activities
            .iter()
            .filter(|a| matches_activity_filter(a, filter))
            .take(limit)
            .cloned()
            .collect())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
