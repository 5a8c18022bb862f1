//! Session configuration
//!
//! Endpoints, the static application key, throttle delay and guest token
//! lifetime for one [`Scraper`](crate::Scraper) session.

use crate::auth::DEFAULT_GUEST_TOKEN_TTL;
use crate::error::{Error, Result};
use crate::pagination::PaginationConfig;
use std::time::Duration;
use url::Url;

/// Public bearer token of the web client
pub const DEFAULT_BEARER_TOKEN: &str = "AAAAAAAAAAAAAAAAAAAAAPYXBAAAAAAACLXUNDekMxqa8h%2F40K4moUkGsoc%3DTYfbDKbT3jJPCEVnMYqilB28NHfOPqkca3qaAxGfsyKCs0wRbw";

/// Site the session cookies belong to
pub const DEFAULT_BASE_URL: &str = "https://twitter.com";

/// Adaptive search endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://twitter.com/i/api/2/search/adaptive.json";

/// Guest token activation endpoint
pub const DEFAULT_GUEST_ACTIVATE_URL: &str = "https://api.twitter.com/1.1/guest/activate.json";

/// Configuration for a scraper session
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Site URL used to scope session cookies
    pub base_url: String,
    /// Search endpoint
    pub search_url: String,
    /// Guest token activation endpoint
    pub guest_activate_url: String,
    /// Static application bearer token
    pub bearer_token: String,
    /// Minimum pause between the end of one request and the start of the
    /// next (zero disables throttling)
    pub request_delay: Duration,
    /// Guest token validity window
    pub guest_token_ttl: Duration,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Pagination behavior for search streams
    pub pagination: PaginationConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            guest_activate_url: DEFAULT_GUEST_ACTIVATE_URL.to_string(),
            bearer_token: DEFAULT_BEARER_TOKEN.to_string(),
            request_delay: Duration::ZERO,
            guest_token_ttl: DEFAULT_GUEST_TOKEN_TTL,
            timeout: Duration::from_secs(30),
            user_agent: format!("birdsearch/{}", env!("CARGO_PKG_VERSION")),
            pagination: PaginationConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Create a new config builder
    pub fn builder() -> ScraperConfigBuilder {
        ScraperConfigBuilder::default()
    }

    /// Check that every endpoint is a valid absolute URL
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("base_url", &self.base_url),
            ("search_url", &self.search_url),
            ("guest_activate_url", &self.guest_activate_url),
        ] {
            Url::parse(value)
                .map_err(|e| Error::config(format!("invalid {field} '{value}': {e}")))?;
        }

        if self.bearer_token.is_empty() {
            return Err(Error::config("bearer_token must not be empty"));
        }

        Ok(())
    }
}

/// Builder for scraper config
#[derive(Default)]
pub struct ScraperConfigBuilder {
    config: ScraperConfig,
}

impl ScraperConfigBuilder {
    /// Point every endpoint at one host (e.g. a mock server)
    ///
    /// Search and activation paths are kept, only the origin changes.
    pub fn api_root(mut self, root: impl AsRef<str>) -> Self {
        let root = root.as_ref().trim_end_matches('/');
        self.config.base_url = root.to_string();
        self.config.search_url = format!("{root}/i/api/2/search/adaptive.json");
        self.config.guest_activate_url = format!("{root}/1.1/guest/activate.json");
        self
    }

    /// Set the cookie scope URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the search endpoint
    pub fn search_url(mut self, url: impl Into<String>) -> Self {
        self.config.search_url = url.into();
        self
    }

    /// Set the guest token activation endpoint
    pub fn guest_activate_url(mut self, url: impl Into<String>) -> Self {
        self.config.guest_activate_url = url.into();
        self
    }

    /// Set the bearer token
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.config.bearer_token = token.into();
        self
    }

    /// Set the pause between requests
    pub fn request_delay(mut self, delay: Duration) -> Self {
        self.config.request_delay = delay;
        self
    }

    /// Set the guest token TTL
    pub fn guest_token_ttl(mut self, ttl: Duration) -> Self {
        self.config.guest_token_ttl = ttl;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set pagination behavior
    pub fn pagination(mut self, pagination: PaginationConfig) -> Self {
        self.config.pagination = pagination;
        self
    }

    /// Build the config
    pub fn build(self) -> ScraperConfig {
        self.config
    }
}
