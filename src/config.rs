//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so the binary can start with zero
//! configuration; with no backend URL set it falls back to seeded in-memory
//! data.

use std::time::Duration;

/// Backend connection settings.
#[derive(Debug, Clone)]
pub struct KeyatConfig {
    /// Base URL of the hosted backend (REST, auth and storage live under it).
    /// Env: `KEYAT_BACKEND_URL`
    /// Default: empty (use the in-memory backend).
    pub backend_url: String,

    /// Publishable API key sent as the `apikey` header on every request.
    /// Env: `KEYAT_ANON_KEY`
    pub anon_key: String,

    /// Access token of the signed-in user, if any.
    /// Env: `KEYAT_ACCESS_TOKEN`
    pub access_token: Option<String>,

    /// Storage bucket holding profile avatars.
    /// Env: `KEYAT_AVATAR_BUCKET`
    /// Default: `avatars`
    pub avatar_bucket: String,

    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for KeyatConfig {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            anon_key: String::new(),
            access_token: None,
            avatar_bucket: "avatars".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl KeyatConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url: std::env::var("KEYAT_BACKEND_URL").unwrap_or(defaults.backend_url),
            anon_key: std::env::var("KEYAT_ANON_KEY").unwrap_or(defaults.anon_key),
            access_token: std::env::var("KEYAT_ACCESS_TOKEN").ok(),
            avatar_bucket: std::env::var("KEYAT_AVATAR_BUCKET").unwrap_or(defaults.avatar_bucket),
            request_timeout: defaults.request_timeout,
        }
    }
}
