use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Property, ServiceProvider, Tour, TourStatus, UserProfile};
use crate::profiles::ProfileUpdate;

/// An authenticated backend session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub access_token: String,
}

/// Common trait over the hosted backend (auth, tables, storage).
///
/// The REST implementation talks to the real service; the in-memory one
/// backs tests and offline runs. Workflow code only ever sees this trait.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Current session, if a user is signed in.
    async fn current_session(&self) -> Result<Option<Session>>;

    /// Invalidate the current session server-side.
    async fn sign_out(&self) -> Result<()>;

    /// Fetch the profile row for a user. `None` when the row is missing,
    /// which callers substitute with a derived placeholder.
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>>;

    /// Apply a staged profile edit in a single update call.
    async fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> Result<UserProfile>;

    /// Full property list; filtering happens client-side.
    async fn list_properties(&self) -> Result<Vec<Property>>;

    /// Full service-provider list.
    async fn list_providers(&self) -> Result<Vec<ServiceProvider>>;

    /// Persist a new tour row.
    async fn insert_tour(&self, tour: &Tour) -> Result<Tour>;

    /// Tours belonging to a tenant, soonest first.
    async fn list_tours(&self, tenant_id: Uuid) -> Result<Vec<Tour>>;

    async fn get_tour(&self, id: Uuid) -> Result<Tour>;

    /// Single-field status update on a tour row.
    async fn set_tour_status(&self, id: Uuid, status: TourStatus) -> Result<Tour>;

    /// Upload avatar bytes to the avatar bucket and return the public URL.
    async fn upload_avatar(
        &self,
        user_id: Uuid,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String>;

    /// Name of the backend implementation, for logging.
    fn name(&self) -> &'static str;
}
