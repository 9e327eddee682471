//! Provider configuration.
//!
//! ```yaml
//! base_url: https://litellm.example.com
//! api_key: sk-1234
//! request_timeout: 30s
//! consistency:
//!   mode: poll          # or fixed_delay
//!   interval: 200ms
//!   timeout: 2s
//! ```

use std::fmt;
use std::time::Duration;

use litellm_http::{DEFAULT_MAX_BODY_SIZE, HttpClientConfig, HttpError, TransportSecurity};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::consistency::ConsistencyPolicy;

const REDACTED: &str = "[REDACTED]";

/// Longest accepted read-back wait or interval.
pub const MAX_CONSISTENCY_WAIT: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base_url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid consistency settings: {0}")]
    InvalidConsistency(String),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] HttpError),
}

/// API key wrapper; never printed, zeroed on drop.
///
/// Serializes as `[REDACTED]` so dumped configuration is safe to share.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Callers must not log or persist the returned slice.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

/// Durations as humantime strings (`"200ms"`, `"2s"`).
mod duration_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&humantime::format_duration(*d).to_string())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyMode {
    #[default]
    Poll,
    FixedDelay,
}

/// Post-create read-back settings.
///
/// `interval` and `timeout` apply to `poll`, `delay` to `fixed_delay`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ConsistencyConfig {
    pub mode: ConsistencyMode,
    #[serde(with = "duration_str")]
    pub interval: Duration,
    #[serde(with = "duration_str")]
    pub timeout: Duration,
    #[serde(with = "duration_str")]
    pub delay: Duration,
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            mode: ConsistencyMode::Poll,
            interval: Duration::from_millis(200),
            timeout: Duration::from_secs(2),
            delay: Duration::from_secs(2),
        }
    }
}

impl ConsistencyConfig {
    /// # Errors
    ///
    /// Poll mode needs a non-zero interval no longer than the timeout.
    /// No duration may exceed [`MAX_CONSISTENCY_WAIT`].
    pub fn policy(&self) -> Result<ConsistencyPolicy, ConfigError> {
        match self.mode {
            ConsistencyMode::FixedDelay => {
                within_ceiling("delay", self.delay)?;
                Ok(ConsistencyPolicy::FixedDelay(self.delay))
            }
            ConsistencyMode::Poll => {
                within_ceiling("interval", self.interval)?;
                within_ceiling("timeout", self.timeout)?;
                if self.interval.is_zero() {
                    return Err(ConfigError::InvalidConsistency(
                        "interval must be greater than zero".to_owned(),
                    ));
                }
                if self.interval > self.timeout {
                    return Err(ConfigError::InvalidConsistency(format!(
                        "interval {} exceeds timeout {}",
                        humantime::format_duration(self.interval),
                        humantime::format_duration(self.timeout)
                    )));
                }
                Ok(ConsistencyPolicy::Poll {
                    interval: self.interval,
                    timeout: self.timeout,
                })
            }
        }
    }
}

fn within_ceiling(name: &str, value: Duration) -> Result<(), ConfigError> {
    if value > MAX_CONSISTENCY_WAIT {
        return Err(ConfigError::InvalidConsistency(format!(
            "{name} {} exceeds the maximum of {}",
            humantime::format_duration(value),
            humantime::format_duration(MAX_CONSISTENCY_WAIT)
        )));
    }
    Ok(())
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}

/// Connection settings for one LiteLLM proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Proxy root, e.g. `https://litellm.example.com`. A path prefix is kept.
    pub base_url: Url,
    /// Sent as `Authorization: Bearer <api_key>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_request_timeout", with = "duration_str")]
    pub request_timeout: Duration,
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Permit `http://` base URLs.
    #[serde(default)]
    pub allow_insecure_http: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub consistency: ConsistencyConfig,
}

impl ProviderConfig {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            request_timeout: default_request_timeout(),
            max_body_size: default_max_body_size(),
            allow_insecure_http: false,
            user_agent: None,
            consistency: ConsistencyConfig::default(),
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key));
        self
    }

    /// Check the base URL and consistency settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
            url: self.base_url.to_string(),
            reason: reason.to_owned(),
        };
        match self.base_url.scheme() {
            "http" if !self.allow_insecure_http => {
                return Err(invalid("http requires allow_insecure_http: true"));
            }
            "http" | "https" => {}
            _ => return Err(invalid("scheme must be http or https")),
        }
        if self.base_url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host"));
        }
        if self.base_url.query().is_some() || self.base_url.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed"));
        }
        self.consistency.policy()?;
        Ok(())
    }

    /// Settings for the underlying HTTP client.
    #[must_use]
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut config = HttpClientConfig {
            request_timeout: self.request_timeout,
            max_body_size: self.max_body_size,
            transport: if self.allow_insecure_http {
                TransportSecurity::AllowInsecureHttp
            } else {
                TransportSecurity::TlsOnly
            },
            ..HttpClientConfig::default()
        };
        if let Some(user_agent) = &self.user_agent {
            config.user_agent.clone_from(user_agent);
        }
        if let Some(key) = &self.api_key {
            config
                .default_headers
                .push(("authorization".to_owned(), format!("Bearer {}", key.expose())));
        }
        config
    }
}
