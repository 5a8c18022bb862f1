//! Throttled, guest-authenticated request executor
//!
//! Every request goes through the same sequence:
//! - wait for the shared throttle slot
//! - make sure a fresh guest token is held
//! - attach bearer, guest token and CSRF headers
//! - classify the status and decode the body or the error envelope

use super::rate_limit::RateLimitSnapshot;
use super::throttle::Throttle;
use super::types::{ApiError, ApiResponse};
use crate::auth::GuestCredentials;
use crate::config::ScraperConfig;
use crate::error::{Error, Result};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, IntoUrl, Request, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Cookie holding the CSRF token
pub const CSRF_COOKIE: &str = "ct0";

const GUEST_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-guest-token");
const CSRF_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-csrf-token");

/// Session-aware HTTP executor shared by all searches of one session
pub struct ApiClient {
    client: Client,
    cookies: Arc<Jar>,
    credentials: GuestCredentials,
    throttle: Throttle,
    bearer_token: String,
    base_url: Url,
}

impl ApiClient {
    /// Create an executor from the session config
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        config.validate()?;

        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .cookie_provider(cookies.clone())
            .build()
            .map_err(Error::Http)?;

        let credentials = GuestCredentials::new(
            client.clone(),
            &config.guest_activate_url,
            &config.bearer_token,
            config.guest_token_ttl,
        );

        Ok(Self {
            client,
            cookies,
            credentials,
            throttle: Throttle::new(config.request_delay),
            bearer_token: config.bearer_token.clone(),
            base_url: Url::parse(&config.base_url)?,
        })
    }

    /// Start a GET request
    pub fn get(&self, url: impl IntoUrl) -> RequestBuilder {
        self.client.get(url)
    }

    /// Start a POST request
    pub fn post(&self, url: impl IntoUrl) -> RequestBuilder {
        self.client.post(url)
    }

    /// Execute a request and decode the body into `T`
    ///
    /// `200` and `403` bodies are decoded (403 carries partial data for
    /// restricted resources). Any other status yields [`Error::Api`] when
    /// the body is an error envelope and [`Error::HttpStatus`] otherwise.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>> {
        // Dropped on every exit path, which starts the cooldown
        let _permit = self.throttle.acquire().await;

        let guest_token = self.credentials.ensure_valid().await?;

        let mut request = request.build().map_err(Error::Http)?;
        self.attach_headers(&mut request, &guest_token)?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!("Request: {} {}", method, url);

        let response = self.client.execute(request).await.map_err(Error::Http)?;
        let status = response.status();

        if status != StatusCode::OK && status != StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            warn!("Request failed with {}: {} {}", status.as_u16(), method, url);
            return Err(classify_error(status, body));
        }

        let rate_limit = RateLimitSnapshot::from_headers(response.headers());
        let bytes = response.bytes().await.map_err(Error::Http)?;
        let data = serde_json::from_slice(&bytes)?;

        debug!(
            "Request succeeded with {}: {} {} (remaining {}/{})",
            status.as_u16(),
            method,
            url,
            rate_limit.remaining,
            rate_limit.limit
        );

        Ok(ApiResponse {
            status,
            data,
            rate_limit,
        })
    }

    /// Add bearer, guest token and (when the cookie exists) CSRF headers
    fn attach_headers(&self, request: &mut Request, guest_token: &str) -> Result<()> {
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.bearer_token))
            .map_err(|e| Error::config(format!("invalid bearer token: {e}")))?;
        let guest = HeaderValue::from_str(guest_token)
            .map_err(|e| Error::malformed_guest_token(format!("unusable token: {e}")))?;
        let csrf = self
            .cookie_for(request.url(), CSRF_COOKIE)
            .and_then(|value| HeaderValue::from_str(&value).ok());

        let headers = request.headers_mut();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(GUEST_TOKEN_HEADER, guest);
        if let Some(csrf) = csrf {
            headers.insert(CSRF_TOKEN_HEADER, csrf);
        }

        Ok(())
    }

    /// Store a `name=value` cookie (optionally with attributes) for the
    /// session's site
    pub fn set_cookie(&self, cookie: &str) {
        self.cookies.add_cookie_str(cookie, &self.base_url);
    }

    /// Look up a cookie the session would send to the site
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookie_for(&self.base_url, name)
    }

    fn cookie_for(&self, url: &Url, name: &str) -> Option<String> {
        let header = self.cookies.cookies(url)?;
        let header = header.to_str().ok()?;
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    }

    /// The guest credential manager
    pub fn credentials(&self) -> &GuestCredentials {
        &self.credentials
    }

    /// The shared throttle
    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}

/// Turn an unacceptable response into an error
fn classify_error(status: StatusCode, body: String) -> Error {
    match ApiError::from_body(&body) {
        Some(api_error) => api_error.into(),
        None => Error::http_status(status.as_u16(), body),
    }
}
