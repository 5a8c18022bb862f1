//! Response and error envelope types

use super::rate_limit::RateLimitSnapshot;
use crate::error::Error;
use reqwest::StatusCode;
use serde::Deserialize;

/// A decoded response and the rate-limit state it reported
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// Response status (200 or 403)
    pub status: StatusCode,
    /// Decoded body
    pub data: T,
    /// Rate-limit telemetry from the response headers
    pub rate_limit: RateLimitSnapshot,
}

impl<T> ApiResponse<T> {
    /// Check if the body came with a 403 (partial data for restricted resources)
    pub fn is_restricted(&self) -> bool {
        self.status == StatusCode::FORBIDDEN
    }

    /// Map the decoded body, keeping status and rate-limit state
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            status: self.status,
            data: f(self.data),
            rate_limit: self.rate_limit,
        }
    }
}

/// Structured error returned in the upstream service's error envelope
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    /// Upstream error code
    pub code: i64,
    /// Upstream error message
    pub message: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorEnvelope {
    Single(ApiError),
    List { errors: Vec<ApiError> },
}

impl ApiError {
    /// Parse an error body, accepting both `{"code", "message"}` and
    /// `{"errors": [{"code", "message"}, ...]}`
    ///
    /// Returns the first error of a list.
    pub fn from_body(body: &str) -> Option<Self> {
        match serde_json::from_str(body).ok()? {
            ErrorEnvelope::Single(err) => Some(err),
            ErrorEnvelope::List { errors } => errors.into_iter().next(),
        }
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api {
            code: err.code,
            message: err.message,
        }
    }
}
