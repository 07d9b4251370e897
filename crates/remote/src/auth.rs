//! Auth provider boundary and error-code translation.

use async_trait::async_trait;

use tracemark_core::error::CoreError;

use crate::session::Session;

/// Hosted identity provider. Implementations return a [`Session`] the
/// caller persists in a [`SessionCache`](crate::session::SessionCache).
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Authenticate with email + password.
    async fn login(&self, email: &str, password: &str) -> Result<Session, CoreError>;

    /// Create a new account and sign it in.
    async fn register(&self, email: &str, password: &str) -> Result<Session, CoreError>;

    /// Best-effort server-side sign-out. Local state is cleared by the
    /// caller regardless of the outcome.
    async fn logout(&self, session: &Session) -> Result<(), CoreError>;
}

/// Map a provider error code to a human-readable message.
///
/// Fixed lookup table; unknown codes get a generic message so raw
/// provider internals never reach the user.
pub fn auth_error_message(code: &str) -> &'static str {
    match code {
        "validation_failed" | "invalid_email" => "The email address is not valid",
        "user_banned" => "This account has been disabled",
        "user_not_found" => "No account exists for that email",
        "invalid_credentials" => "Incorrect email or password",
        "email_exists" | "user_already_exists" => "That email is already registered",
        "weak_password" => "The password is too weak",
        "over_request_rate_limit" => "Too many attempts, try again later",
        _ => "Authentication failed, please try again",
    }
}
