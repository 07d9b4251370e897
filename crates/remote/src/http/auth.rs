//! Auth-provider client for the hosted identity API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use tracemark_core::error::CoreError;

use crate::auth::{auth_error_message, AuthProvider};
use crate::session::Session;

/// Talks to `{base}/auth/v1`.
#[derive(Debug, Clone)]
pub struct HttpAuth {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Successful token/signup response (subset we consume).
#[derive(Debug, Deserialize)]
struct AuthSuccess {
    #[serde(default)]
    access_token: Option<String>,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Error body the provider returns on auth failure.
#[derive(Debug, Deserialize)]
struct AuthFailure {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default, alias = "error_description", alias = "message")]
    msg: Option<String>,
}

impl HttpAuth {
    pub fn new(http: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    async fn authenticate(&self, url: String, email: &str, password: &str) -> Result<Session, CoreError> {
        let response = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| CoreError::AuthError {
                message: format!("Auth request failed: {e}"),
            })?;

        if !response.status().is_success() {
            let failure: AuthFailure = response.json().await.unwrap_or(AuthFailure {
                error_code: None,
                msg: None,
            });
            let message = match failure.error_code.as_deref() {
                Some(code) => auth_error_message(code).to_string(),
                None => failure
                    .msg
                    .unwrap_or_else(|| auth_error_message("").to_string()),
            };
            return Err(CoreError::AuthError { message });
        }

        let success: AuthSuccess = response.json().await.map_err(|e| CoreError::AuthError {
            message: format!("Unexpected auth response: {e}"),
        })?;
        Ok(Session {
            uid: success.user.id,
            email: success.user.email.unwrap_or_else(|| email.to_string()),
            access_token: success.access_token,
        })
    }
}

#[async_trait]
impl AuthProvider for HttpAuth {
    async fn login(&self, email: &str, password: &str) -> Result<Session, CoreError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let session = self.authenticate(url, email, password).await?;
        tracing::info!(uid = %session.uid, "Logged in");
        Ok(session)
    }

    async fn register(&self, email: &str, password: &str) -> Result<Session, CoreError> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let session = self.authenticate(url, email, password).await?;
        tracing::info!(uid = %session.uid, "Registered");
        Ok(session)
    }

    async fn logout(&self, session: &Session) -> Result<(), CoreError> {
        // Without a token there is nothing to revoke server-side.
        let Some(token) = session.access_token.as_deref() else {
            return Ok(());
        };
        let result = self
            .http
            .post(format!("{}/auth/v1/logout", self.base_url))
            .header("apikey", &self.api_key)
            .header("authorization", format!("Bearer {token}"))
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) => {
                tracing::warn!(status = %response.status(), "Server-side logout rejected");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Server-side logout unreachable");
                Ok(())
            }
        }
    }
}
