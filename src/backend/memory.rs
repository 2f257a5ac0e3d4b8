//! In-memory implementation of the backend trait.
//!
//! Backs unit tests and offline runs of the binary when no backend URL is
//! configured, seeded with listings that look like real Gaborone inventory.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::backend::traits::{Backend, Session};
use crate::error::{KeyatError, Result};
use crate::models::{
    Property, PropertyStatus, Role, ServiceProvider, Tour, TourStatus, UserProfile,
};
use crate::profiles::ProfileUpdate;

#[derive(Default)]
struct State {
    session: Option<Session>,
    profiles: Vec<UserProfile>,
    properties: Vec<Property>,
    providers: Vec<ServiceProvider>,
    tours: Vec<Tour>,
}

#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demo dataset: a signed-in tenant, three Gaborone listings and two
    /// service providers. Prices are minor-unit Pula (thebe).
    pub fn seeded() -> Self {
        let backend = Self::new();
        let tenant_id = Uuid::new_v4();
        let landlord_id = Uuid::new_v4();
        let now = Utc::now();

        {
            let mut state = backend.lock();

            state.session = Some(Session {
                user_id: tenant_id,
                email: "thato@example.bw".to_string(),
                access_token: "demo-token".to_string(),
            });

            state.profiles.push(UserProfile {
                id: tenant_id,
                first_name: "Thato".to_string(),
                last_name: "Molefe".to_string(),
                email: "thato@example.bw".to_string(),
                phone: Some("+267 71 234 567".to_string()),
                role: Some(Role::Consumer),
                avatar_url: None,
                bio: None,
                location: Some("Gaborone".to_string()),
                created_at: now,
            });

            let listings = [
                ("Modern 2-bed in Block 9", "Block 9, Gaborone", 450_000_i64, 2, "apartment", 4.6, 18),
                ("Family house near Game City", "Kgale View, Gaborone", 780_000, 3, "house", 4.2, 9),
                ("Studio flat, CBD", "CBD, Gaborone", 320_000, 1, "apartment", 3.9, 31),
            ];
            for (title, location, price, bedrooms, property_type, rating, reviews) in listings {
                state.properties.push(Property {
                    id: Uuid::new_v4(),
                    owner_id: landlord_id,
                    title: title.to_string(),
                    location: location.to_string(),
                    price,
                    bedrooms,
                    bathrooms: bedrooms.min(2),
                    area_sqm: 40 + bedrooms * 30,
                    property_type: property_type.to_string(),
                    status: PropertyStatus::Available,
                    images: vec![],
                    amenities: vec!["parking".to_string(), "wifi".to_string()],
                    rating,
                    review_count: reviews,
                    created_at: now,
                    updated_at: now,
                });
            }

            state.providers.push(ServiceProvider {
                id: Uuid::new_v4(),
                name: "Kgalagadi Plumbing".to_string(),
                category: "plumbing".to_string(),
                description: "Residential plumbing and geyser repairs".to_string(),
                rating: 4.8,
                review_count: 42,
                price_range: "P150 - P600".to_string(),
                availability: "Mon-Sat, 08:00-17:00".to_string(),
                created_at: now,
            });
            state.providers.push(ServiceProvider {
                id: Uuid::new_v4(),
                name: "Tlokweng Movers".to_string(),
                category: "moving".to_string(),
                description: "Local and cross-border moves".to_string(),
                rating: 4.1,
                review_count: 17,
                price_range: "P800 - P3500".to_string(),
                availability: "Daily".to_string(),
                created_at: now,
            });
        }

        backend
    }

    pub fn with_session(self, session: Session) -> Self {
        self.lock().session = Some(session);
        self
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.lock().profiles.push(profile);
        self
    }

    pub fn with_property(self, property: Property) -> Self {
        self.lock().properties.push(property);
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Recover rather than panic if a test thread poisoned the lock.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.lock().session.clone())
    }

    async fn sign_out(&self) -> Result<()> {
        self.lock().session = None;
        Ok(())
    }

    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        Ok(self
            .lock()
            .profiles
            .iter()
            .find(|p| p.id == user_id)
            .cloned())
    }

    async fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> Result<UserProfile> {
        let mut state = self.lock();
        let profile = state
            .profiles
            .iter_mut()
            .find(|p| p.id == user_id)
            .ok_or(KeyatError::NotFound)?;
        update.apply_to(profile);
        Ok(profile.clone())
    }

    async fn list_properties(&self) -> Result<Vec<Property>> {
        Ok(self.lock().properties.clone())
    }

    async fn list_providers(&self) -> Result<Vec<ServiceProvider>> {
        Ok(self.lock().providers.clone())
    }

    async fn insert_tour(&self, tour: &Tour) -> Result<Tour> {
        self.lock().tours.push(tour.clone());
        Ok(tour.clone())
    }

    async fn list_tours(&self, tenant_id: Uuid) -> Result<Vec<Tour>> {
        let mut tours: Vec<Tour> = self
            .lock()
            .tours
            .iter()
            .filter(|t| t.tenant_id == tenant_id)
            .cloned()
            .collect();
        tours.sort_by_key(|t| t.preferred_date);
        Ok(tours)
    }

    async fn get_tour(&self, id: Uuid) -> Result<Tour> {
        self.lock()
            .tours
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(KeyatError::NotFound)
    }

    async fn set_tour_status(&self, id: Uuid, status: TourStatus) -> Result<Tour> {
        let mut state = self.lock();
        let tour = state
            .tours
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(KeyatError::NotFound)?;
        tour.status = status;
        Ok(tour.clone())
    }

    async fn upload_avatar(
        &self,
        user_id: Uuid,
        _bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let ext = match content_type {
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "jpg",
        };
        Ok(format!("memory://avatars/{}.{}", user_id, ext))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
