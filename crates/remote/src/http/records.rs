//! Record-store client for the PostgREST-style rows API.

use async_trait::async_trait;

use tracemark_core::target::{NewTarget, Target, TargetChanges};
use tracemark_core::types::{TargetId, UserId};

use crate::error::StoreError;
use crate::http::error_for_status;
use crate::record_store::RecordStore;

/// Table holding all target records.
const TARGETS_TABLE: &str = "targets";

/// Talks to `{base}/rest/v1/targets`.
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpRecordStore {
    pub fn new(http: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TARGETS_TABLE)
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .header("authorization", format!("Bearer {}", self.api_key))
    }

    /// Decode the row array PostgREST returns for every
    /// representation-returning call.
    async fn rows(response: reqwest::Response) -> Result<Vec<Target>, StoreError> {
        let response = error_for_status(response).await?;
        response
            .json::<Vec<Target>>()
            .await
            .map_err(|e| StoreError::Decode(format!("target rows: {e}")))
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn insert(&self, target: &NewTarget) -> Result<Target, StoreError> {
        let response = self
            .request(reqwest::Method::POST, self.table_url())
            .header("prefer", "return=representation")
            .json(target)
            .send()
            .await?;
        let mut rows = Self::rows(response).await?;
        if rows.is_empty() {
            return Err(StoreError::Decode("insert returned no row".into()));
        }
        Ok(rows.swap_remove(0))
    }

    async fn update(
        &self,
        id: &TargetId,
        changes: &TargetChanges,
    ) -> Result<Option<Target>, StoreError> {
        let response = self
            .request(
                reqwest::Method::PATCH,
                format!("{}?id=eq.{id}", self.table_url()),
            )
            .header("prefer", "return=representation")
            .json(changes)
            .send()
            .await?;
        let mut rows = Self::rows(response).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    async fn delete(&self, id: &TargetId) -> Result<(), StoreError> {
        let response = self
            .request(
                reqwest::Method::DELETE,
                format!("{}?id=eq.{id}", self.table_url()),
            )
            .send()
            .await?;
        error_for_status(response).await?;
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Target>, StoreError> {
        let response = self
            .request(
                reqwest::Method::GET,
                format!("{}?select=*&user_id=eq.{owner_id}", self.table_url()),
            )
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn find_by_id(&self, id: &TargetId) -> Result<Option<Target>, StoreError> {
        let response = self
            .request(
                reqwest::Method::GET,
                format!("{}?select=*&id=eq.{id}", self.table_url()),
            )
            .send()
            .await?;
        let mut rows = Self::rows(response).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }
}
