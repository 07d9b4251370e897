//! Object storage boundary.

use async_trait::async_trait;

use crate::error::StoreError;

/// Key-value object storage for uploaded AR assets.
///
/// Paths are raw (unencoded) `{owner}/{name}` strings; implementations
/// handle any transport encoding themselves.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `path`. With `overwrite`, an existing object
    /// at the same path is replaced; without it, the put fails on
    /// collision.
    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
        overwrite: bool,
    ) -> Result<(), StoreError>;

    /// Durably addressable public URL for an object path. Derivation
    /// is deterministic and does not touch the network, so it also
    /// works for path prefixes (the NFT descriptor base).
    fn public_url(&self, path: &str) -> String;

    /// Reverse of [`public_url`](Self::public_url): recover the object
    /// path from one of our public URLs. Returns `None` for foreign
    /// URLs.
    fn object_path(&self, public_url: &str) -> Option<String>;

    /// Remove the given objects. Partial removals are not reported
    /// per item.
    async fn remove(&self, paths: &[String]) -> Result<(), StoreError>;
}
