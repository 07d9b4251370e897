//! Record storage boundary for the `targets` table.

use async_trait::async_trait;

use tracemark_core::target::{NewTarget, Target, TargetChanges};
use tracemark_core::types::{TargetId, UserId};

use crate::error::StoreError;

/// Relational storage for target records.
///
/// Every read the client performs is scoped by owner; the store
/// assigns record ids on insert.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record and return it with its assigned id.
    async fn insert(&self, target: &NewTarget) -> Result<Target, StoreError>;

    /// Apply a partial update; returns the updated record, or `None`
    /// when no row matched.
    async fn update(&self, id: &TargetId, changes: &TargetChanges)
        -> Result<Option<Target>, StoreError>;

    /// Delete by id. Deleting a missing record is not an error.
    async fn delete(&self, id: &TargetId) -> Result<(), StoreError>;

    /// All records owned by `owner_id`, in store order. Empty vec on
    /// no match.
    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Target>, StoreError>;

    /// Fetch one record by id.
    async fn find_by_id(&self, id: &TargetId) -> Result<Option<Target>, StoreError>;
}
