//! Configuration structures for ghboard.
//!
//! - [`ApiConfig`] - GraphQL endpoint, token, transport timeout
//! - [`CacheConfig`] - store freshness window
//! - [`SearchConfig`] - search and pagination defaults
//! - [`Config`] - root configuration combining all settings
//!
//! Every level is `#[serde(default)]`, so a configuration file only needs the
//! keys it wants to override.

use std::time::Duration;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default GitHub GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

/// Default freshness window for a hydrated store.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default number of results per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// GitHub caps connection page sizes at 100 nodes.
const MAX_PAGE_LIMIT: u32 = 100;

/// Settings for talking to the GraphQL API.
///
/// # Examples
///
/// ```
/// use gb_core::ApiConfig;
///
/// let config = ApiConfig::default();
/// assert_eq!(config.endpoint, "https://api.github.com/graphql");
/// assert!(config.token.is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,

    /// Bearer token. Never serialized back out.
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Whole-request timeout for the HTTP transport, in seconds.
    pub timeout_secs: u64,

    /// `User-Agent` header sent with every request (GitHub rejects requests without one).
    pub user_agent: String,

    /// `first:` argument used for every connection in the bundled queries.
    pub page_limit: u32,
}

impl ApiConfig {
    /// Returns the configured token or [`ConfigError::MissingToken`].
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingToken)
    }

    /// Returns the transport timeout as a [`Duration`].
    #[inline]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            token: None,
            timeout_secs: 30,
            user_agent: concat!("ghboard/", env!("CARGO_PKG_VERSION")).to_owned(),
            page_limit: 50,
        }
    }
}

// Hand-written so the token never ends up in logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("page_limit", &self.page_limit)
            .finish()
    }
}

/// Store freshness settings.
///
/// # Examples
///
/// ```
/// use gb_core::CacheConfig;
/// use std::time::Duration;
///
/// assert_eq!(CacheConfig::default().ttl(), Duration::from_secs(300));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a successful fetch keeps a store fresh, in seconds.
    pub ttl_secs: u64,
}

impl CacheConfig {
    /// Returns the freshness window as a [`Duration`].
    #[inline]
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// Search and pagination defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Page size a store starts with and returns to on reset.
    pub default_page_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Root configuration for ghboard.
///
/// # Examples
///
/// ```
/// use gb_core::Config;
///
/// let config = Config::from_toml_str("[cache]\nttl_secs = 60\n").unwrap();
/// assert_eq!(config.cache.ttl_secs, 60);
/// assert_eq!(config.search.default_page_size, 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GraphQL transport configuration.
    pub api: ApiConfig,

    /// Store freshness configuration.
    pub cache: CacheConfig,

    /// Search configuration.
    pub search: SearchConfig,
}

impl Config {
    /// Parses a configuration from a TOML document and validates it.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let source =
            std::fs::read_to_string(path).map_err(|source| ConfigError::read(path, source))?;
        Self::from_toml_str(&source)
    }

    /// Checks every option for values the stores and transport cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.api.endpoint.trim();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(ConfigError::invalid_option(
                "api.endpoint",
                "must be an http(s) URL",
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::invalid_option(
                "api.timeout_secs",
                "must be positive",
            ));
        }
        if self.api.page_limit == 0 || self.api.page_limit > MAX_PAGE_LIMIT {
            return Err(ConfigError::invalid_option(
                "api.page_limit",
                format!("must be between 1 and {MAX_PAGE_LIMIT}"),
            ));
        }
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::invalid_option(
                "cache.ttl_secs",
                "must be positive",
            ));
        }
        if self.search.default_page_size == 0 {
            return Err(ConfigError::invalid_option(
                "search.default_page_size",
                "must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api.page_limit, 50);
        assert_eq!(config.cache.ttl(), Duration::from_secs(300));
        assert_eq!(config.search.default_page_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = Config::from_toml_str("[api]\npage_limit = 20\n").unwrap();
        assert_eq!(config.api.page_limit, 20);
        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.cache.ttl_secs, DEFAULT_CACHE_TTL_SECS);
    }

    #[test]
    fn test_rejects_zero_ttl() {
        let err = Config::from_toml_str("[cache]\nttl_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("cache.ttl_secs"));
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let err = Config::from_toml_str("[api]\nendpoint = \"ftp://example\"\n").unwrap_err();
        assert!(err.to_string().contains("api.endpoint"));
    }

    #[test]
    fn test_rejects_page_limit_above_github_cap() {
        let err = Config::from_toml_str("[api]\npage_limit = 101\n").unwrap_err();
        assert!(err.to_string().contains("api.page_limit"));
    }

    #[test]
    fn test_require_token() {
        let mut api = ApiConfig::default();
        assert!(matches!(api.require_token(), Err(ConfigError::MissingToken)));

        api.token = Some("   ".to_owned());
        assert!(api.require_token().is_err());

        api.token = Some("ghp_abc".to_owned());
        assert_eq!(api.require_token().unwrap(), "ghp_abc");
    }

    #[test]
    fn test_token_is_redacted_and_not_serialized() {
        let mut config = Config::default();
        config.api.token = Some("ghp_secret".to_owned());

        assert!(!format!("{config:?}").contains("ghp_secret"));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("ghp_secret"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Config::load(Utf8Path::new("/nonexistent/ghboard.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
