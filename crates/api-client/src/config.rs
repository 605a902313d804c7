//! Configuration for the menu API client
//!
//! The base URL is resolved once, when the configuration is built: an
//! explicit URL wins; on a loopback origin the local proxy path or the local
//! backend is used; everywhere else the API is expected under `/api` on the
//! same origin.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

/// Ordinary request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout of the credential refresh call
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// Same-origin API path, also used by the local reverse proxy
const API_PATH: &str = "/api";

/// Backend address when developing without the proxy
const LOCAL_BACKEND_URL: &str = "http://localhost:5001/api";

/// Origin assumed when none is configured
const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Refresh endpoint, relative to the base URL
const REFRESH_PATH: &str = "auth/refresh";

/// Environment variables read by [`ClientConfig::from_env`]
pub mod env_vars {
    /// Explicit API base URL
    pub const API_URL: &str = "MENU_API_URL";
    /// Alternative name for [`API_URL`]
    pub const API_BASE: &str = "MENU_API_BASE";
    /// `true` selects the local proxy path on loopback hosts
    pub const USE_PROXY: &str = "MENU_USE_PROXY";
    /// Origin the menu is served from
    pub const ORIGIN: &str = "MENU_ORIGIN";
    /// Ordinary request timeout in seconds
    pub const TIMEOUT_SECS: &str = "MENU_TIMEOUT_SECS";
}

/// How the base URL was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseUrlSource {
    /// Supplied through the environment or a builder
    Explicit,
    /// Loopback host behind the development proxy
    LocalProxy,
    /// Loopback host talking to the backend directly
    LocalBackend,
    /// `/api` on the serving origin
    SameOrigin,
}

/// Whether `host` names the local machine
#[must_use]
pub fn is_loopback_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "[::1]" | "::1")
}

/// Pick the (possibly relative) API base URL
#[must_use]
pub fn resolve_base_url(explicit: Option<&str>, host: &str, use_proxy: bool) -> (String, BaseUrlSource) {
    if let Some(url) = explicit.filter(|u| !u.trim().is_empty()) {
        return (url.trim().to_string(), BaseUrlSource::Explicit);
    }

    if is_loopback_host(host) {
        return if use_proxy {
            (API_PATH.to_string(), BaseUrlSource::LocalProxy)
        } else {
            (LOCAL_BACKEND_URL.to_string(), BaseUrlSource::LocalBackend)
        };
    }

    (API_PATH.to_string(), BaseUrlSource::SameOrigin)
}

/// Join a relative base URL onto the serving origin
fn absolutize(base: &str, origin: &Url) -> ApiResult<String> {
    origin
        .join(base)
        .map(String::from)
        .map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Absolute API base URL
    pub base_url: String,
    /// How `base_url` was chosen
    pub base_url_source: BaseUrlSource,
    /// Origin the menu is served from
    pub origin: String,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Refresh call timeout
    #[serde(with = "duration_secs")]
    pub refresh_timeout: Duration,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: LOCAL_BACKEND_URL.to_string(),
            base_url_source: BaseUrlSource::LocalBackend,
            origin: DEFAULT_ORIGIN.to_string(),
            timeout: DEFAULT_TIMEOUT,
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `MENU_API_URL` or `MENU_API_BASE`: explicit API base URL
    /// - `MENU_USE_PROXY`: `true` to use the `/api` proxy on loopback hosts
    /// - `MENU_ORIGIN`: origin the menu is served from
    /// - `MENU_TIMEOUT_SECS`: request timeout in seconds
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let origin_str = non_empty(env_vars::ORIGIN).unwrap_or_else(|| DEFAULT_ORIGIN.to_string());
        let origin = Url::parse(&origin_str)
            .map_err(|e| ApiError::InvalidUrl(format!("{origin_str}: {e}")))?;
        let host = origin.host_str().unwrap_or_default();

        let explicit = non_empty(env_vars::API_URL).or_else(|| non_empty(env_vars::API_BASE));
        let use_proxy = lookup(env_vars::USE_PROXY)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));

        let (base, base_url_source) = resolve_base_url(explicit.as_deref(), host, use_proxy);
        let base_url = absolutize(&base, &origin)?;

        let timeout = lookup(env_vars::TIMEOUT_SECS)
            .and_then(|s| s.trim().parse().ok())
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        let config = Self {
            base_url,
            base_url_source,
            origin: origin_str,
            timeout,
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
        };
        config.validate()?;
        Ok(config)
    }

    /// Builder-style method to set an explicit base URL
    ///
    /// Relative URLs are joined onto the configured origin.
    pub fn with_base_url(mut self, url: impl Into<String>) -> ApiResult<Self> {
        let url = url.into();
        let origin = Url::parse(&self.origin)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.origin)))?;
        self.base_url = absolutize(url.trim(), &origin)?;
        self.base_url_source = BaseUrlSource::Explicit;
        Ok(self)
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the refresh timeout
    #[must_use]
    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    /// Absolute URL of an endpoint below the base URL
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Absolute URL of the credential refresh endpoint
    #[must_use]
    pub fn refresh_url(&self) -> String {
        self.endpoint_url(REFRESH_PATH)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config("base_url must start with http:// or https://"));
        }

        if self.timeout.is_zero() || self.refresh_timeout.is_zero() {
            return Err(ApiError::config("timeouts cannot be zero"));
        }

        Ok(())
    }
}
