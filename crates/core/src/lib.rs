//! Domain model, asset classification, and object-naming rules for
//! tracemark AR targets.
//!
//! Everything in this crate is pure: no network, no filesystem. The
//! remote boundaries live in `tracemark-remote`, the workflows that
//! drive them in `tracemark-targets`.

pub mod classify;
pub mod error;
pub mod naming;
pub mod target;
pub mod types;
