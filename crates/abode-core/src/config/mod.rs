//! Client configuration for the listings backend.
//!
//! Provides a `ClientConfig` used by every store to reach the remote API. The
//! values are public endpoints and knobs; credentials never live here.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

pub const ENV_API_BASE_URL: &str = "ABODE_API_BASE_URL";
pub const ENV_AUTH_SCHEME: &str = "ABODE_AUTH_SCHEME";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "ABODE_REQUEST_TIMEOUT_SECS";
pub const ENV_BLOG_PAGE_SIZE: &str = "ABODE_BLOG_PAGE_SIZE";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BLOG_PAGE_SIZE: u32 = 10;

/// How the stored token is placed in the `Authorization` header.
///
/// The backend historically receives the raw token string; `Bearer` is
/// available for deployments that expect the standard scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    #[default]
    Raw,
    Bearer,
}

impl AuthScheme {
    /// Render the header value for `token`.
    #[must_use]
    pub fn header_value(self, token: &str) -> String {
        match self {
            Self::Raw => token.to_string(),
            Self::Bearer => format!("Bearer {token}"),
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => f.write_str("raw"),
            Self::Bearer => f.write_str("bearer"),
        }
    }
}

impl FromStr for AuthScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "bearer" => Ok(Self::Bearer),
            other => Err(Error::Configuration(format!(
                "unknown auth scheme '{other}' (expected raw or bearer)"
            ))),
        }
    }
}

/// Runtime client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,
    #[serde(default)]
    pub auth_scheme: AuthScheme,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_blog_page_size")]
    pub blog_page_size: u32,
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_blog_page_size() -> u32 {
    DEFAULT_BLOG_PAGE_SIZE
}

impl ClientConfig {
    /// Build a config for `api_base_url` with default knobs.
    pub fn new(api_base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_base_url: normalize_base_url(&api_base_url.into())?,
            auth_scheme: AuthScheme::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            blog_page_size: DEFAULT_BLOG_PAGE_SIZE,
        })
    }

    /// Read configuration from `ABODE_*` environment variables.
    ///
    /// Returns `Ok(None)` when no base URL is configured.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>> {
        let Some(base_url) = normalize_text_option(lookup(ENV_API_BASE_URL)) else {
            return Ok(None);
        };

        let mut config = Self::new(base_url)?;
        if let Some(scheme) = normalize_text_option(lookup(ENV_AUTH_SCHEME)) {
            config.auth_scheme = scheme.parse()?;
        }
        if let Some(raw) = normalize_text_option(lookup(ENV_REQUEST_TIMEOUT_SECS)) {
            config.request_timeout_secs = parse_positive(&raw, ENV_REQUEST_TIMEOUT_SECS)?;
        }
        if let Some(raw) = normalize_text_option(lookup(ENV_BLOG_PAGE_SIZE)) {
            let size = parse_positive(&raw, ENV_BLOG_PAGE_SIZE)?;
            config.blog_page_size = u32::try_from(size).map_err(|_| {
                Error::Configuration(format!("{ENV_BLOG_PAGE_SIZE} is too large: {size}"))
            })?;
        }
        Ok(Some(config))
    }

    #[must_use]
    pub const fn with_auth_scheme(mut self, auth_scheme: AuthScheme) -> Self {
        self.auth_scheme = auth_scheme;
        self
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Trim and validate an API base URL.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(Error::Configuration(
            "API base URL must not be empty".to_string(),
        ));
    }
    if !is_http_url(&base) {
        return Err(Error::Configuration(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(base)
}

fn parse_positive(raw: &str, key: &str) -> Result<u64> {
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(Error::Configuration(format!(
            "{key} must be a positive integer, got '{raw}'"
        ))),
    }
}
