//! Backend configuration parsed from environment variables.

use super::types::BaasError;

pub const DEFAULT_ISSUES_TABLE: &str = "issues";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaasTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for BaasTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaasConfig {
    /// Project base URL, without trailing slash.
    pub url: String,
    pub anon_key: String,
    pub service_key: Option<String>,
    pub timeouts: BaasTimeouts,
}

impl BaasConfig {
    /// Build typed backend config from environment variables.
    ///
    /// Required:
    /// - `BAAS_URL`
    /// - `BAAS_ANON_KEY`
    ///
    /// Optional:
    /// - `BAAS_SERVICE_KEY`: used for server-side reads
    /// - `BAAS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BAAS_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`BaasError::ConfigParse`] if a required variable is missing
    /// or the URL is not http(s).
    pub fn from_env() -> Result<Self, BaasError> {
        let url = required("BAAS_URL")?;
        let anon_key = required("BAAS_ANON_KEY")?;
        let service_key = std::env::var("BAAS_SERVICE_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let timeouts = BaasTimeouts {
            request_secs: env_parse_u64("BAAS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("BAAS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Self::new(url, anon_key, service_key, timeouts)
    }

    /// # Errors
    ///
    /// Returns [`BaasError::ConfigParse`] if `url` is not http(s).
    pub fn new(
        url: String,
        anon_key: String,
        service_key: Option<String>,
        timeouts: BaasTimeouts,
    ) -> Result<Self, BaasError> {
        let url = normalize_url(&url)?;
        Ok(Self { url, anon_key, service_key, timeouts })
    }
}

fn required(key: &str) -> Result<String, BaasError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| BaasError::ConfigParse(format!("{key} not set")))
}

pub(crate) fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn normalize_url(raw: &str) -> Result<String, BaasError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(BaasError::ConfigParse(format!("BAAS_URL must be http(s): {raw}")));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
