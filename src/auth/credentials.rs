//! Guest credential manager
//!
//! Issues guest tokens against the activation endpoint and caches them
//! until they outlive their TTL.

use super::types::GuestToken;
use crate::error::{Error, Result};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Owns the session's guest token and its refresh policy
pub struct GuestCredentials {
    /// HTTP client for issuance requests
    http_client: Client,
    /// Guest token activation endpoint
    activate_url: String,
    /// Static application bearer token
    bearer_token: String,
    /// Validity window of an issued token
    ttl: Duration,
    /// Currently issued token, if any
    cached_token: Arc<RwLock<Option<GuestToken>>>,
}

impl GuestCredentials {
    /// Create a credential manager
    pub fn new(
        http_client: Client,
        activate_url: impl Into<String>,
        bearer_token: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            http_client,
            activate_url: activate_url.into(),
            bearer_token: bearer_token.into(),
            ttl,
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Return a usable guest token, issuing a new one when the current
    /// token is missing or older than the TTL
    ///
    /// Concurrent callers that observe an expired token wait on the same
    /// write lock, so only the first of them performs the issuance call.
    pub async fn ensure_valid(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired(self.ttl) {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired(self.ttl) {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_guest_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Issue a new token regardless of the current one
    pub async fn refresh(&self) -> Result<String> {
        let mut cached = self.cached_token.write().await;
        let new_token = self.fetch_guest_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);
        Ok(token_str)
    }

    /// Call the activation endpoint
    async fn fetch_guest_token(&self) -> Result<GuestToken> {
        debug!("Requesting guest token from {}", self.activate_url);

        let response = self
            .http_client
            .post(&self.activate_url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            return Err(Error::GuestTokenRequest {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| Error::malformed_guest_token(format!("invalid JSON: {e}")))?;

        let token = json
            .get("guest_token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::malformed_guest_token("guest_token not found"))?;

        info!("Issued new guest token");
        Ok(GuestToken::new(token))
    }

    /// Snapshot of the current token
    pub async fn current(&self) -> Option<GuestToken> {
        self.cached_token.read().await.clone()
    }

    /// Check if a non-expired token is held
    pub async fn is_valid(&self) -> bool {
        self.cached_token
            .read()
            .await
            .as_ref()
            .is_some_and(|t| !t.is_expired(self.ttl))
    }

    /// Drop the current token so the next request issues a fresh one
    pub async fn clear(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// Install a token obtained elsewhere
    pub async fn set(&self, token: GuestToken) {
        let mut cached = self.cached_token.write().await;
        *cached = Some(token);
    }

    /// The configured TTL
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl std::fmt::Debug for GuestCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuestCredentials")
            .field("activate_url", &self.activate_url)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
