//! BaaS types — errors, auth payloads, and the `Backend` trait.
//!
//! Provider-neutral shapes shared by the HTTP client and the in-memory
//! backend used in tests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::query::Query;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend operations.
///
/// `Api` displays the provider's message alone so handlers can show it to
/// the user verbatim.
#[derive(Debug, thiserror::Error)]
pub enum BaasError {
    /// A configuration value is missing or malformed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The HTTP request could not be sent or its body could not be read.
    #[error("{0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The backend's response body could not be deserialized.
    #[error("unexpected response from backend: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl BaasError {
    /// `true` when the backend rejected the caller's credentials or token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }
}

// =============================================================================
// AUTH PAYLOADS
// =============================================================================

/// Email/password pair submitted by the login and signup forms.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// The authenticated account as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// A signed-in session. Only the access token is kept by this service; the
/// refresh token in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// Result of a sign-up. Projects that require email confirmation return a
/// user without a session.
#[derive(Debug, Clone)]
pub struct SignUpOutcome {
    pub user: Option<AuthUser>,
    pub session: Option<AuthSession>,
}

// =============================================================================
// ACCESS
// =============================================================================

/// Which key authorizes a data request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access<'a> {
    /// On behalf of a signed-in user, with their access token.
    User(&'a str),
    /// On behalf of this server (service-role key, or the anon key when no
    /// service key is configured).
    Service,
}

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// Async seam over the hosted backend. Enables an in-memory backend in tests.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Register a new account. `email_redirect_to` is the target of the
    /// confirmation link in the signup email.
    ///
    /// # Errors
    ///
    /// Returns a [`BaasError`] if the request fails or the backend rejects it.
    async fn sign_up(
        &self,
        credentials: &Credentials,
        email_redirect_to: Option<&str>,
    ) -> Result<SignUpOutcome, BaasError>;

    /// Exchange email and password for a session.
    ///
    /// # Errors
    ///
    /// Returns a [`BaasError`] if the request fails or the credentials are rejected.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, BaasError>;

    /// Revoke the session behind an access token.
    ///
    /// # Errors
    ///
    /// Returns a [`BaasError`] if the request fails.
    async fn sign_out(&self, access_token: &str) -> Result<(), BaasError>;

    /// Resolve the user behind an access token. `Ok(None)` when the token is
    /// unknown or expired.
    ///
    /// # Errors
    ///
    /// Returns a [`BaasError`] on transport failure or an unexpected status.
    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, BaasError>;

    /// Fetch the rows matching `query`.
    ///
    /// # Errors
    ///
    /// Returns a [`BaasError`] if the request fails or the backend rejects it.
    async fn select(&self, access: Access<'_>, query: &Query) -> Result<Vec<serde_json::Value>, BaasError>;

    /// Insert one row into `table`, returning the stored representation.
    ///
    /// # Errors
    ///
    /// Returns a [`BaasError`] if the request fails or the backend rejects it.
    async fn insert(
        &self,
        access: Access<'_>,
        table: &str,
        row: serde_json::Value,
    ) -> Result<Vec<serde_json::Value>, BaasError>;

    /// Apply `patch` to every row matching `query`'s filters.
    ///
    /// # Errors
    ///
    /// Returns a [`BaasError`] if the request fails or the backend rejects it.
    async fn update(
        &self,
        access: Access<'_>,
        query: &Query,
        patch: serde_json::Value,
    ) -> Result<Vec<serde_json::Value>, BaasError>;

    /// Delete every row matching `query`'s filters.
    ///
    /// # Errors
    ///
    /// Returns a [`BaasError`] if the request fails or the backend rejects it.
    async fn delete(&self, access: Access<'_>, query: &Query) -> Result<(), BaasError>;
}
