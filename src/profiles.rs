//! Profile editing: staged field edits written in one update call, and
//! avatar upload to the storage bucket with the public URL written back to
//! the profile row so it survives a reload.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::backend::Backend;
use crate::error::Result;
use crate::models::UserProfile;

/// Staged profile edits. Only set fields are serialized, so the backend
/// update touches nothing else.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.location.is_none()
            && self.bio.is_none()
            && self.avatar_url.is_none()
    }

    /// Overlay the staged fields onto an existing profile.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(v) = &self.first_name {
            profile.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            profile.last_name = v.clone();
        }
        if let Some(v) = &self.phone {
            profile.phone = Some(v.clone());
        }
        if let Some(v) = &self.location {
            profile.location = Some(v.clone());
        }
        if let Some(v) = &self.bio {
            profile.bio = Some(v.clone());
        }
        if let Some(v) = &self.avatar_url {
            profile.avatar_url = Some(v.clone());
        }
    }
}

/// Write staged edits in a single update call. A no-op update returns the
/// current row unchanged without issuing a request.
pub async fn save_profile(
    backend: &dyn Backend,
    user_id: Uuid,
    update: &ProfileUpdate,
) -> Result<UserProfile> {
    if update.is_empty() {
        return backend
            .fetch_profile(user_id)
            .await?
            .ok_or(crate::error::KeyatError::NotFound);
    }
    let profile = backend.update_profile(user_id, update).await?;
    info!(user = %user_id, "profile saved");
    Ok(profile)
}

/// Upload avatar bytes to the bucket, then persist the public URL on the
/// profile row.
pub async fn upload_avatar(
    backend: &dyn Backend,
    user_id: Uuid,
    bytes: Vec<u8>,
    content_type: &str,
) -> Result<UserProfile> {
    let url = backend.upload_avatar(user_id, bytes, content_type).await?;
    let update = ProfileUpdate {
        avatar_url: Some(url),
        ..Default::default()
    };
    save_profile(backend, user_id, &update).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::models::Role;
    use chrono::Utc;

    fn profile(id: Uuid) -> UserProfile {
        UserProfile {
            id,
            first_name: "Amo".to_string(),
            last_name: "Seretse".to_string(),
            email: "amo@example.bw".to_string(),
            phone: None,
            role: Some(Role::Consumer),
            avatar_url: None,
            bio: None,
            location: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn staged_edits_land_in_one_update() {
        let id = Uuid::new_v4();
        let backend = MemoryBackend::new().with_profile(profile(id));

        let update = ProfileUpdate {
            phone: Some("+267 72 000 111".to_string()),
            bio: Some("Looking in Block 9".to_string()),
            ..Default::default()
        };
        let saved = save_profile(&backend, id, &update).await.unwrap();

        assert_eq!(saved.phone.as_deref(), Some("+267 72 000 111"));
        assert_eq!(saved.bio.as_deref(), Some("Looking in Block 9"));
        // Untouched fields keep their values.
        assert_eq!(saved.first_name, "Amo");
        assert_eq!(saved.role, Some(Role::Consumer));
    }

    #[tokio::test]
    async fn empty_update_is_a_no_op() {
        let id = Uuid::new_v4();
        let backend = MemoryBackend::new().with_profile(profile(id));

        let saved = save_profile(&backend, id, &ProfileUpdate::default())
            .await
            .unwrap();
        assert_eq!(saved.first_name, "Amo");
    }

    #[tokio::test]
    async fn avatar_url_survives_a_reload() {
        let id = Uuid::new_v4();
        let backend = MemoryBackend::new().with_profile(profile(id));

        let saved = upload_avatar(&backend, id, vec![0xFF, 0xD8], "image/jpeg")
            .await
            .unwrap();
        let url = saved.avatar_url.expect("avatar url set");
        assert!(url.ends_with(&format!("{}.jpg", id)));

        // A fresh fetch (what a reload does) still sees the URL.
        let reloaded = backend.fetch_profile(id).await.unwrap().unwrap();
        assert_eq!(reloaded.avatar_url.as_deref(), Some(url.as_str()));
    }

    #[test]
    fn only_set_fields_serialize() {
        let update = ProfileUpdate {
            phone: Some("+267 72 000 111".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "phone": "+267 72 000 111" })
        );
    }
}
