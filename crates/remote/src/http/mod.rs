//! reqwest-backed clients for a Supabase-style hosted backend.
//!
//! One [`RemoteClient`] owns the shared [`reqwest::Client`]
//! (connection pooling) and hands out the per-boundary clients:
//! [`HttpObjectStore`] for `/storage/v1`, [`HttpRecordStore`] for
//! `/rest/v1`, and [`HttpAuth`] for `/auth/v1`.

mod auth;
mod records;
mod storage;

pub use auth::HttpAuth;
pub use records::HttpRecordStore;
pub use storage::HttpObjectStore;

use crate::config::RemoteConfig;

/// Entry point for all remote access.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    config: RemoteConfig,
}

impl RemoteClient {
    /// Create a client with a fresh connection pool.
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(http: reqwest::Client, config: RemoteConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Object-storage client for the configured bucket.
    pub fn object_store(&self) -> HttpObjectStore {
        HttpObjectStore::new(
            self.http.clone(),
            self.config.base_url.clone(),
            self.config.bucket.clone(),
            self.config.api_key.clone(),
        )
    }

    /// Record-store client for the `targets` table.
    pub fn record_store(&self) -> HttpRecordStore {
        HttpRecordStore::new(
            self.http.clone(),
            self.config.base_url.clone(),
            self.config.api_key.clone(),
        )
    }

    /// Auth-provider client.
    pub fn auth(&self) -> HttpAuth {
        HttpAuth::new(
            self.http.clone(),
            self.config.base_url.clone(),
            self.config.api_key.clone(),
        )
    }
}

/// Convert a non-2xx response into [`StoreError::Api`], consuming the
/// body for diagnostics.
pub(crate) async fn error_for_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, crate::error::StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(crate::error::StoreError::Api {
        status: status.as_u16(),
        body,
    })
}
