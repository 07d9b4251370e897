//! Remote backend configuration loaded from environment variables.

use std::path::PathBuf;

/// Default bucket holding all AR assets.
pub const DEFAULT_BUCKET: &str = "ar-assets";

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the backend, no trailing slash
    /// (e.g. `https://abc.supabase.co`).
    pub base_url: String,
    /// Anonymous/public API key sent with every request.
    pub api_key: String,
    /// Object-store bucket for AR assets (default: `ar-assets`).
    pub bucket: String,
    /// Where the session cache file lives.
    pub session_path: PathBuf,
}

impl RemoteConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `TRACEMARK_BASE_URL`    | (required)                 |
    /// | `TRACEMARK_API_KEY`     | (required)                 |
    /// | `TRACEMARK_BUCKET`      | `ar-assets`                |
    /// | `TRACEMARK_SESSION`     | `.tracemark-session.json`  |
    pub fn from_env() -> Result<Self, String> {
        let base_url = std::env::var("TRACEMARK_BASE_URL")
            .map_err(|_| "TRACEMARK_BASE_URL must be set".to_string())?;
        let api_key = std::env::var("TRACEMARK_API_KEY")
            .map_err(|_| "TRACEMARK_API_KEY must be set".to_string())?;
        let bucket =
            std::env::var("TRACEMARK_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string());
        let session_path = std::env::var("TRACEMARK_SESSION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".tracemark-session.json"));

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            bucket,
            session_path,
        })
    }

    /// Construct directly (tests, embedding).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            bucket: DEFAULT_BUCKET.to_string(),
            session_path: PathBuf::from(".tracemark-session.json"),
        }
    }
}
