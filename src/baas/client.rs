//! HTTP client for the hosted backend's auth and REST endpoints.
//!
//! Thin wrapper: every operation is a single request. Pure parsing lives in
//! the `parse_*` functions for testability.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde_json::Value;

use super::config::BaasConfig;
use super::query::Query;
use super::types::{Access, AuthSession, AuthUser, BaasError, Backend, Credentials, SignUpOutcome};

// =============================================================================
// CLIENT
// =============================================================================

pub struct BaasClient {
    http: reqwest::Client,
    config: BaasConfig,
}

impl BaasClient {
    /// # Errors
    ///
    /// Returns [`BaasError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: BaasConfig) -> Result<Self, BaasError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| BaasError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.url
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.url)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.url)
    }

    /// `(apikey, bearer)` pair for a data request.
    fn keys<'a>(&'a self, access: Access<'a>) -> (&'a str, &'a str) {
        match access {
            Access::User(token) => (self.config.anon_key.as_str(), token),
            Access::Service => {
                let key = self
                    .config
                    .service_key
                    .as_deref()
                    .unwrap_or(&self.config.anon_key);
                (key, key)
            }
        }
    }

    fn authorized(&self, request: RequestBuilder, access: Access<'_>) -> RequestBuilder {
        let (apikey, bearer) = self.keys(access);
        request
            .header("apikey", apikey)
            .header("Authorization", format!("Bearer {bearer}"))
    }
}

async fn send(request: RequestBuilder) -> Result<String, BaasError> {
    let response = request
        .send()
        .await
        .map_err(|e| BaasError::Request(e.to_string()))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| BaasError::Request(e.to_string()))?;

    if !status.is_success() {
        let message = error_message(&text).unwrap_or_else(|| {
            status
                .canonical_reason()
                .map_or_else(|| format!("request failed with status {}", status.as_u16()), str::to_owned)
        });
        return Err(BaasError::Api { status: status.as_u16(), message });
    }

    Ok(text)
}

#[async_trait::async_trait]
impl Backend for BaasClient {
    async fn sign_up(
        &self,
        credentials: &Credentials,
        email_redirect_to: Option<&str>,
    ) -> Result<SignUpOutcome, BaasError> {
        let mut request = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.config.anon_key)
            .json(credentials);
        if let Some(redirect) = email_redirect_to {
            request = request.query(&[("redirect_to", redirect)]);
        }
        parse_sign_up(&send(request).await?)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, BaasError> {
        let request = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.config.anon_key)
            .json(credentials);
        parse_session(&send(request).await?)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BaasError> {
        let request = self.authorized(self.http.post(self.auth_url("logout")), Access::User(access_token));
        send(request).await.map(|_| ())
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, BaasError> {
        let request = self.authorized(self.http.get(self.auth_url("user")), Access::User(access_token));
        match send(request).await {
            Ok(text) => parse_user(&text).map(Some),
            Err(e) if e.is_unauthorized() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn select(&self, access: Access<'_>, query: &Query) -> Result<Vec<Value>, BaasError> {
        let request = self
            .http
            .get(self.rest_url(query.table_name()))
            .query(&query.select_params());
        parse_rows(&send(self.authorized(request, access)).await?)
    }

    async fn insert(&self, access: Access<'_>, table: &str, row: Value) -> Result<Vec<Value>, BaasError> {
        let request = self
            .http
            .post(self.rest_url(table))
            .header("Prefer", "return=representation")
            .json(&row);
        parse_rows(&send(self.authorized(request, access)).await?)
    }

    async fn update(&self, access: Access<'_>, query: &Query, patch: Value) -> Result<Vec<Value>, BaasError> {
        let request = self
            .http
            .patch(self.rest_url(query.table_name()))
            .query(&query.filter_params())
            .header("Prefer", "return=representation")
            .json(&patch);
        parse_rows(&send(self.authorized(request, access)).await?)
    }

    async fn delete(&self, access: Access<'_>, query: &Query) -> Result<(), BaasError> {
        let request = self
            .http
            .delete(self.rest_url(query.table_name()))
            .query(&query.filter_params());
        send(self.authorized(request, access)).await.map(|_| ())
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Pull a human-readable message out of an error body. Auth endpoints use
/// `msg` or `error_description`, the REST layer uses `message`.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Ok(json) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.to_owned());
    };
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| json.get(key).and_then(Value::as_str))
        .filter(|msg| !msg.is_empty())
        .map(str::to_owned)
}

pub(crate) fn parse_session(body: &str) -> Result<AuthSession, BaasError> {
    serde_json::from_str(body).map_err(|e| BaasError::Parse(e.to_string()))
}

pub(crate) fn parse_user(body: &str) -> Result<AuthUser, BaasError> {
    serde_json::from_str(body).map_err(|e| BaasError::Parse(e.to_string()))
}

/// Signup answers with a session when the project auto-confirms, otherwise
/// with the bare user (or `{ "user": .., "session": null }`).
pub(crate) fn parse_sign_up(body: &str) -> Result<SignUpOutcome, BaasError> {
    let json: Value = serde_json::from_str(body).map_err(|e| BaasError::Parse(e.to_string()))?;

    if json.get("access_token").is_some() {
        let session: AuthSession = serde_json::from_value(json).map_err(|e| BaasError::Parse(e.to_string()))?;
        return Ok(SignUpOutcome { user: Some(session.user.clone()), session: Some(session) });
    }

    let user_value = match json.get("user") {
        Some(user) if user.is_object() => user.clone(),
        _ => json,
    };
    let user = if user_value.get("id").is_some() {
        Some(serde_json::from_value(user_value).map_err(|e| BaasError::Parse(e.to_string()))?)
    } else {
        None
    };
    Ok(SignUpOutcome { user, session: None })
}

pub(crate) fn parse_rows(body: &str) -> Result<Vec<Value>, BaasError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<Value>(body).map_err(|e| BaasError::Parse(e.to_string()))? {
        Value::Array(rows) => Ok(rows),
        Value::Object(row) => Ok(vec![Value::Object(row)]),
        other => Err(BaasError::Parse(format!("expected rows, got {other}"))),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
