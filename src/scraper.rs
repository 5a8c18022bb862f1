//! Search session facade
//!
//! A [`Scraper`] bundles one session's executor (cookies, guest token,
//! throttle) with its search preferences. Clones share the session.

use crate::config::ScraperConfig;
use crate::error::{Error, Result};
use crate::http::{ApiClient, ApiResponse, RateLimitSnapshot};
use crate::pagination::{paginate, Page, PageFetcher, SearchStream};
use crate::search::{search_params, Profile, SearchMode, Timeline, Tweet, MAX_SEARCH_PAGE_SIZE};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Cookie marking a logged-in session
pub const AUTH_COOKIE: &str = "auth_token";

/// Search session
#[derive(Clone)]
pub struct Scraper {
    api: Arc<ApiClient>,
    config: Arc<ScraperConfig>,
    search_mode: SearchMode,
    include_replies: bool,
}

impl Scraper {
    /// Create a session with the default config
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    /// Create a session from a config
    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        let api = ApiClient::new(&config)?;
        Ok(Self {
            api: Arc::new(api),
            config: Arc::new(config),
            search_mode: SearchMode::default(),
            include_replies: false,
        })
    }

    /// Use `mode` for tweet searches
    #[must_use]
    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// Switch the tweet search mode
    pub fn set_search_mode(&mut self, mode: SearchMode) {
        self.search_mode = mode;
    }

    /// Current tweet search mode
    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    /// Include replies in tweet searches
    #[must_use]
    pub fn with_replies(mut self, include: bool) -> Self {
        self.include_replies = include;
        self
    }

    /// Load session cookies (e.g. exported from a browser login)
    pub fn set_cookies(&self, cookies: &[(&str, &str)]) {
        for (name, value) in cookies {
            self.api.set_cookie(&format!("{name}={value}"));
        }
        debug!(
            "Loaded {} cookies (logged in: {})",
            cookies.len(),
            self.is_logged_in()
        );
    }

    /// Check if the session carries a login cookie
    pub fn is_logged_in(&self) -> bool {
        self.api
            .cookie(AUTH_COOKIE)
            .is_some_and(|value| !value.is_empty())
    }

    /// Drop the cached guest token so the next request fetches a new one
    pub async fn clear_guest_token(&self) {
        self.api.credentials().clear().await;
    }

    /// The session's request executor
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The session config
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Stream up to `max_tweets` posts matching `query`
    pub fn search_tweets(&self, query: impl Into<String>, max_tweets: usize) -> SearchStream<Tweet> {
        paginate(
            TweetSearch(self.clone()),
            query,
            max_tweets,
            self.config.pagination.clone(),
        )
    }

    /// Stream up to `max_profiles` profiles matching `query`
    pub fn search_profiles(
        &self,
        query: impl Into<String>,
        max_profiles: usize,
    ) -> SearchStream<Profile> {
        paginate(
            ProfileSearch(self.clone()),
            query,
            max_profiles,
            self.config.pagination.clone(),
        )
    }

    /// Fetch one page of posts
    ///
    /// `count` is capped at [`MAX_SEARCH_PAGE_SIZE`]. Pass the previous
    /// page's `next_cursor` to continue, or an empty cursor to start.
    pub async fn fetch_search_tweets(
        &self,
        query: &str,
        count: usize,
        cursor: &str,
    ) -> Result<Page<Tweet>> {
        let (page, _) = self
            .fetch_search_tweets_with_rate_limit(query, count, cursor)
            .await?;
        Ok(page)
    }

    /// Fetch one page of posts along with the rate-limit window
    pub async fn fetch_search_tweets_with_rate_limit(
        &self,
        query: &str,
        count: usize,
        cursor: &str,
    ) -> Result<(Page<Tweet>, RateLimitSnapshot)> {
        let response = self
            .search_timeline(query, count, cursor, self.search_mode)
            .await?;
        Ok((response.data.into_tweets(), response.rate_limit))
    }

    /// Fetch one page of profiles
    pub async fn fetch_search_profiles(
        &self,
        query: &str,
        count: usize,
        cursor: &str,
    ) -> Result<Page<Profile>> {
        let response = self
            .search_timeline(query, count, cursor, SearchMode::Users)
            .await?;
        Ok(response.data.into_profiles())
    }

    async fn search_timeline(
        &self,
        query: &str,
        count: usize,
        cursor: &str,
        mode: SearchMode,
    ) -> Result<ApiResponse<Timeline>> {
        if !self.is_logged_in() {
            return Err(Error::authorization_required("search"));
        }

        let count = count.min(MAX_SEARCH_PAGE_SIZE);
        debug!(
            "Searching '{}' ({:?}, count {}, cursor '{}')",
            query, mode, count, cursor
        );

        let params = search_params(query, count, cursor, mode, self.include_replies);
        let request = self.api.get(self.config.search_url.as_str()).query(&params);
        self.api.execute(request).await
    }
}

impl std::fmt::Debug for Scraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scraper")
            .field("api", &self.api)
            .field("search_mode", &self.search_mode)
            .field("include_replies", &self.include_replies)
            .finish_non_exhaustive()
    }
}

struct TweetSearch(Scraper);

#[async_trait]
impl PageFetcher<Tweet> for TweetSearch {
    async fn fetch_page(&self, query: &str, page_size: usize, cursor: &str) -> Result<Page<Tweet>> {
        self.0.fetch_search_tweets(query, page_size, cursor).await
    }
}

struct ProfileSearch(Scraper);

#[async_trait]
impl PageFetcher<Profile> for ProfileSearch {
    async fn fetch_page(
        &self,
        query: &str,
        page_size: usize,
        cursor: &str,
    ) -> Result<Page<Profile>> {
        self.0.fetch_search_profiles(query, page_size, cursor).await
    }
}
