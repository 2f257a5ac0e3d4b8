use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role tag classifying a user account.
///
/// Stored as a lowercase string column on the profile row; the serialized
/// form must match what the backend holds (`service_provider`, not camel
/// case).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Consumer,
    Landlord,
    Agent,
    ServiceProvider,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Consumer => "consumer",
            Role::Landlord => "landlord",
            Role::Agent => "agent",
            Role::ServiceProvider => "service_provider",
            Role::Admin => "admin",
        }
    }
}

/// Listing status of a rentable unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Available,
    Rented,
    Maintenance,
    Unavailable,
}

/// Lifecycle status of a property viewing appointment.
///
/// `completed` and `cancelled` are terminal; a tour row in either state is
/// never mutated again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TourStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl TourStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TourStatus::Completed | TourStatus::Cancelled)
    }

    /// Whether `next` is a legal successor of this status.
    ///
    /// Tenants cancel from `scheduled` or `confirmed`; the agent-facing flow
    /// moves `scheduled -> confirmed -> completed`.
    pub fn can_transition_to(self, next: TourStatus) -> bool {
        matches!(
            (self, next),
            (TourStatus::Scheduled, TourStatus::Confirmed)
                | (TourStatus::Confirmed, TourStatus::Completed)
                | (TourStatus::Scheduled, TourStatus::Cancelled)
                | (TourStatus::Confirmed, TourStatus::Cancelled)
        )
    }
}

/// A rentable unit listed by a landlord or agent.
///
/// `price` is in minor-unit Pula (thebe) so comparisons and sorting stay
/// integral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    /// Landlord or agent who owns the listing.
    pub owner_id: Uuid,
    pub title: String,
    pub location: String,
    pub price: i64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area_sqm: u32,
    pub property_type: String,
    pub status: PropertyStatus,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub rating: f32,
    pub review_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A scheduled property viewing linking a tenant, a property and
/// (optionally) an agent.
///
/// The serialized shape is the one stable wire format in the system; it is
/// written by the scheduling flow and read back by the tour list and detail
/// views, so field names here must not drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    pub id: Uuid,
    pub property_id: Uuid,
    pub tenant_id: Uuid,
    /// Frequently unresolved at scheduling time.
    pub agent_id: Option<Uuid>,
    pub preferred_date: DateTime<Utc>,
    /// `HH:MM`, 24-hour.
    pub viewing_time: String,
    pub notes: Option<String>,
    pub status: TourStatus,
    pub meeting_point: String,
    /// Minutes.
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub created_at: DateTime<Utc>,
}

impl Tour {
    /// Display name for the assigned agent, with the placeholder used
    /// everywhere an agent has not been resolved yet.
    pub fn agent_display(&self) -> String {
        match self.agent_id {
            Some(id) => format!("Agent {}", id),
            None => "Agent TBA".to_string(),
        }
    }
}

/// Per-user profile row mirroring the auth identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Empty for accounts registered before roles existed.
    pub role: Option<Role>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Derived stand-in used when the profile row is missing: the email
    /// prefix becomes the display name and the role stays unset.
    pub fn placeholder(id: Uuid, email: &str) -> Self {
        let name = email.split('@').next().unwrap_or("resident").to_string();
        Self {
            id,
            first_name: name,
            last_name: String::new(),
            email: email.to_string(),
            phone: None,
            role: None,
            avatar_url: None,
            bio: None,
            location: None,
            created_at: Utc::now(),
        }
    }

    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// A home-services marketplace listing (plumber, cleaner, mover, ...).
///
/// Rating and review aggregates are displayed as stored, never recomputed
/// client-side. The price range is an unstructured display string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceProvider {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: String,
    pub rating: f32,
    pub review_count: u32,
    pub price_range: String,
    pub availability: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_literals_match_backend_columns() {
        assert_eq!(
            serde_json::to_string(&TourStatus::Scheduled).unwrap(),
            "\"scheduled\""
        );
        assert_eq!(
            serde_json::to_string(&PropertyStatus::Maintenance).unwrap(),
            "\"maintenance\""
        );
        assert_eq!(
            serde_json::to_string(&Role::ServiceProvider).unwrap(),
            "\"service_provider\""
        );
    }

    #[test]
    fn tour_transitions() {
        use TourStatus::*;

        assert!(Scheduled.can_transition_to(Confirmed));
        assert!(Scheduled.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));

        // Terminal states never move again.
        for terminal in [Completed, Cancelled] {
            assert!(terminal.is_terminal());
            for next in [Scheduled, Confirmed, Completed, Cancelled] {
                assert!(!terminal.can_transition_to(next));
            }
        }

        // No skipping straight to completed.
        assert!(!Scheduled.can_transition_to(Completed));
    }

    #[test]
    fn tour_wire_shape_is_stable() {
        let tour = Tour {
            id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            agent_id: None,
            preferred_date: Utc::now(),
            viewing_time: "09:00".to_string(),
            notes: None,
            status: TourStatus::Scheduled,
            meeting_point: "Gate".to_string(),
            duration_minutes: 45,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&tour).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "property_id",
            "tenant_id",
            "preferred_date",
            "viewing_time",
            "notes",
            "status",
            "meeting_point",
            "duration",
            "created_at",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(object["duration"], 45);
        assert_eq!(object["status"], "scheduled");
    }

    #[test]
    fn placeholder_profile_uses_email_prefix() {
        let profile = UserProfile::placeholder(Uuid::new_v4(), "neo@example.bw");
        assert_eq!(profile.display_name(), "neo");
        assert!(profile.role.is_none());
    }
}
