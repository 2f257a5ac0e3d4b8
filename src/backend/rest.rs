//! REST implementation of the backend trait.
//!
//! Tables live under `/rest/v1`, auth under `/auth/v1` and object storage
//! under `/storage/v1`, the layout the hosted service exposes. Every call is
//! a single attempt; failures are returned to the caller, never retried.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::backend::traits::{Backend, Session};
use crate::config::KeyatConfig;
use crate::error::{KeyatError, Result};
use crate::models::{Property, ServiceProvider, Tour, TourStatus, UserProfile};
use crate::profiles::ProfileUpdate;

use tracing::{debug, info, warn};

/// Shape of the `/auth/v1/user` response.
#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
    email: String,
}

pub struct RestBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
    avatar_bucket: String,
}

impl RestBackend {
    pub fn new(config: &KeyatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent("keyat/0.1")
            .build()?;

        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            access_token: config.access_token.clone(),
            avatar_bucket: config.avatar_bucket.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Attach the `apikey` and bearer headers every endpoint expects. The
    /// bearer falls back to the anon key when no user is signed in.
    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        req.header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", bearer))
    }

    /// Map a non-success response to a typed backend error.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), %message, "backend request failed");
        Err(KeyatError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    /// `select` with equality filters; PostgREST always answers with an
    /// array, even for single-row lookups.
    async fn select<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
        order: Option<&str>,
    ) -> Result<Vec<T>> {
        let mut req = self
            .authorize(self.client.get(self.table_url(table)))
            .query(&[("select", "*")]);
        for (column, value) in filters {
            req = req.query(&[(*column, format!("eq.{}", value))]);
        }
        if let Some(order) = order {
            req = req.query(&[("order", order)]);
        }

        debug!(table, "select");
        let response = Self::check(req.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Single-row variant of [`Self::select`].
    async fn select_one<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Option<T>> {
        let mut rows: Vec<T> = self.select(table, filters, None).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn current_session(&self) -> Result<Option<Session>> {
        let Some(token) = &self.access_token else {
            return Ok(None);
        };

        let req = self
            .authorize(self.client.get(format!("{}/auth/v1/user", self.base_url)));
        let response = Self::check(req.send().await?).await?;
        let user: AuthUser = response.json().await?;

        Ok(Some(Session {
            user_id: user.id,
            email: user.email,
            access_token: token.clone(),
        }))
    }

    async fn sign_out(&self) -> Result<()> {
        let req = self
            .authorize(self.client.post(format!("{}/auth/v1/logout", self.base_url)));
        Self::check(req.send().await?).await?;
        info!("signed out");
        Ok(())
    }

    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        self.select_one("profiles", &[("id", user_id.to_string())])
            .await
    }

    async fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> Result<UserProfile> {
        let req = self
            .authorize(self.client.patch(self.table_url("profiles")))
            .query(&[("id", format!("eq.{}", user_id))])
            .header("Prefer", "return=representation")
            .json(update);

        let response = Self::check(req.send().await?).await?;
        let mut rows: Vec<UserProfile> = response.json().await?;
        if rows.is_empty() {
            return Err(KeyatError::NotFound);
        }
        Ok(rows.swap_remove(0))
    }

    async fn list_properties(&self) -> Result<Vec<Property>> {
        self.select("properties", &[], Some("created_at.desc")).await
    }

    async fn list_providers(&self) -> Result<Vec<ServiceProvider>> {
        self.select("service_providers", &[], Some("rating.desc"))
            .await
    }

    async fn insert_tour(&self, tour: &Tour) -> Result<Tour> {
        let req = self
            .authorize(self.client.post(self.table_url("tours")))
            .header("Prefer", "return=representation")
            .json(tour);

        let response = Self::check(req.send().await?).await?;
        let mut rows: Vec<Tour> = response.json().await?;
        if rows.is_empty() {
            return Err(KeyatError::NotFound);
        }
        Ok(rows.swap_remove(0))
    }

    async fn list_tours(&self, tenant_id: Uuid) -> Result<Vec<Tour>> {
        self.select(
            "tours",
            &[("tenant_id", tenant_id.to_string())],
            Some("preferred_date.asc"),
        )
        .await
    }

    async fn get_tour(&self, id: Uuid) -> Result<Tour> {
        self.select_one("tours", &[("id", id.to_string())])
            .await?
            .ok_or(KeyatError::NotFound)
    }

    async fn set_tour_status(&self, id: Uuid, status: TourStatus) -> Result<Tour> {
        let req = self
            .authorize(self.client.patch(self.table_url("tours")))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&json!({ "status": status }));

        let response = Self::check(req.send().await?).await?;
        let mut rows: Vec<Tour> = response.json().await?;
        if rows.is_empty() {
            return Err(KeyatError::NotFound);
        }
        Ok(rows.swap_remove(0))
    }

    async fn upload_avatar(
        &self,
        user_id: Uuid,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let ext = match content_type {
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "jpg",
        };
        let path = format!("{}.{}", user_id, ext);

        let req = self
            .authorize(self.client.post(format!(
                "{}/storage/v1/object/{}/{}",
                self.base_url, self.avatar_bucket, path
            )))
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(bytes);

        Self::check(req.send().await?).await?;
        info!(%path, "uploaded avatar");

        Ok(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.avatar_bucket, path
        ))
    }

    fn name(&self) -> &'static str {
        "rest"
    }
}
