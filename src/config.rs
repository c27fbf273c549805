//! Application configuration parsed from environment variables.

use crate::baas::BaasError;
use crate::baas::config::{BaasConfig, DEFAULT_ISSUES_TABLE};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_EMAIL_REDIRECT_URL: &str = "http://localhost:3000/login";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error(transparent)]
    Backend(#[from] BaasError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub issues_table: String,
    /// Target of the confirmation link in signup emails.
    pub email_redirect_url: String,
    pub cookie_secure: bool,
    pub baas: BaasConfig,
}

impl AppConfig {
    /// Build the app config from environment variables.
    ///
    /// - `PORT`: default 3000
    /// - `BAAS_ISSUES_TABLE`: default `issues`
    /// - `EMAIL_REDIRECT_URL`: default `http://localhost:3000/login`
    /// - `COOKIE_SECURE`: inferred from the redirect URL scheme when unset
    /// - plus everything [`BaasConfig::from_env`] reads
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is malformed or the backend config is incomplete.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            Err(_) => DEFAULT_PORT,
        };
        let issues_table = std::env::var("BAAS_ISSUES_TABLE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ISSUES_TABLE.to_owned());
        let email_redirect_url = std::env::var("EMAIL_REDIRECT_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EMAIL_REDIRECT_URL.to_owned());
        let cookie_secure = cookie_secure(env_bool("COOKIE_SECURE"), &email_redirect_url);
        let baas = BaasConfig::from_env()?;

        Ok(Self { port, issues_table, email_redirect_url, cookie_secure, baas })
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

/// Explicit setting wins; otherwise Secure cookies follow an https site URL.
pub(crate) fn cookie_secure(explicit: Option<bool>, site_url: &str) -> bool {
    explicit.unwrap_or_else(|| site_url.starts_with("https://"))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
