//! Remote boundaries for tracemark: the auth provider, object store,
//! and record store contracts, plus reqwest-backed implementations
//! speaking a Supabase-style REST surface.
//!
//! The traits are the seam the workflows in `tracemark-targets` are
//! written against; tests substitute in-memory fakes for them.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod object_store;
pub mod record_store;
pub mod session;

pub use config::RemoteConfig;
pub use error::StoreError;
pub use http::RemoteClient;
pub use session::{Session, SessionCache};
