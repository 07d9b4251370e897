//! Object-store client for the storage REST API.

use async_trait::async_trait;
use serde_json::json;

use tracemark_core::naming::{decode_path_component, encode_path_component, encode_path_segments};

use crate::error::StoreError;
use crate::http::error_for_status;
use crate::object_store::ObjectStore;

/// Talks to `{base}/storage/v1` for one bucket.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    api_key: String,
}

impl HttpObjectStore {
    pub fn new(http: reqwest::Client, base_url: String, bucket: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            bucket,
            api_key,
        }
    }

    /// `{base}/storage/v1/object/public/{bucket}/` — the prefix every
    /// public object URL of this bucket starts with.
    fn public_prefix(&self) -> String {
        format!(
            "{}/storage/v1/object/public/{}/",
            self.base_url, self.bucket
        )
    }

    fn object_endpoint(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            encode_path_segments(path)
        )
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
        overwrite: bool,
    ) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.object_endpoint(path))
            .header("apikey", &self.api_key)
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("content-type", content_type)
            .header("x-upsert", if overwrite { "true" } else { "false" })
            .body(bytes.to_vec())
            .send()
            .await?;
        error_for_status(response).await?;
        tracing::debug!(path, size = bytes.len(), "Stored object");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.public_prefix(), encode_path_component(path))
    }

    fn object_path(&self, public_url: &str) -> Option<String> {
        // Query strings (e.g. cache busters) are not part of the path.
        let clean = public_url.split('?').next().unwrap_or(public_url);
        let encoded = clean.strip_prefix(&self.public_prefix())?;
        if encoded.is_empty() {
            return None;
        }
        Some(decode_path_component(encoded))
    }

    async fn remove(&self, paths: &[String]) -> Result<(), StoreError> {
        let response = self
            .http
            .delete(format!(
                "{}/storage/v1/object/{}",
                self.base_url, self.bucket
            ))
            .header("apikey", &self.api_key)
            .header("authorization", format!("Bearer {}", self.api_key))
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;
        error_for_status(response).await?;
        tracing::debug!(count = paths.len(), "Removed objects");
        Ok(())
    }
}
