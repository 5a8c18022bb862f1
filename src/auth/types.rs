//! Guest credential types

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Default validity window of a guest token (3 hours)
pub const DEFAULT_GUEST_TOKEN_TTL: Duration = Duration::from_secs(3 * 60 * 60);

/// An issued guest token and the moment it was issued
///
/// Replaced wholesale on every refresh, never updated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestToken {
    /// The opaque token value
    pub token: String,
    /// When the token was issued
    pub issued_at: DateTime<Utc>,
}

impl GuestToken {
    /// Create a token issued now
    pub fn new(token: impl Into<String>) -> Self {
        Self::issued_at(token, Utc::now())
    }

    /// Create a token with an explicit issuance time
    pub fn issued_at(token: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            issued_at,
        }
    }

    /// Time elapsed since issuance
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.issued_at
    }

    /// Check whether the token is older than `ttl`
    ///
    /// A TTL too large to represent never expires.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        chrono::Duration::from_std(ttl).is_ok_and(|ttl| self.age() >= ttl)
    }
}
