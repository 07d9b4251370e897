//! Target workflows: the repository adapter that turns classified
//! uploads into remote writes, the descriptor verifier, and the
//! per-user session orchestrator.

pub mod config;
pub mod repository;
pub mod session;
pub mod verifier;

pub use config::MarkerDimensions;
pub use repository::{DeleteOutcome, TargetRepository, DESCRIPTOR_SUFFIXES};
pub use session::TargetSession;
pub use verifier::{DescriptorVerifier, ProbeOutcome, ProbeReport};
