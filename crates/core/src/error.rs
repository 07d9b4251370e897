//! Domain error taxonomy shared across the workspace.

use crate::types::TargetId;

/// Errors produced by classification, the repository adapter, and the
/// session layer.
///
/// Remote-boundary failures (HTTP, serialization) arrive through the
/// `Store` variant so callers see one error type end to end.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// One or more selected files carry an extension outside the
    /// accepted set. Upload never starts.
    #[error("Unsupported file type(s): {}. Allowed: .iset, .fset, .fset3, .patt, .jpg, .jpeg, .png", names.join(", "))]
    InvalidFileType {
        /// Names of the offending files, in selection order.
        names: Vec<String>,
    },

    /// The selection is valid file-by-file but matches no upload
    /// intent (no complete descriptor set, no pattern, no image).
    #[error("Selection matches no target kind: expected the 3 descriptor files together, a .patt file, or an image")]
    NoRecognizedAssetCombination,

    /// Descriptor stems differ and strict stem checking was requested.
    #[error("Descriptor file stems differ: expected '{expected}', found '{found}'")]
    DescriptorStemMismatch { expected: String, found: String },

    /// One of the three descriptor uploads failed. Already-uploaded
    /// descriptors are not rolled back.
    #[error("Descriptor upload failed for '{path}': {reason}")]
    PartialUploadFailure { path: String, reason: String },

    /// No record matched the requested id.
    #[error("Target not found: {id}")]
    RecordNotFound { id: TargetId },

    /// The final record delete failed. Object cleanup may already have
    /// happened by this point.
    #[error("Failed to delete target record {id}: {reason}")]
    RecordDeleteFailed { id: TargetId, reason: String },

    /// Authentication failed; `message` is already human-readable
    /// (mapped through the provider code table).
    #[error("{message}")]
    AuthError { message: String },

    /// An operation requiring identity ran without a cached session.
    #[error("Not logged in")]
    NotLoggedIn,

    /// A verification probe could not reach the remote host.
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// A remote-boundary failure (object store or record store).
    #[error("Store error: {0}")]
    Store(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}
