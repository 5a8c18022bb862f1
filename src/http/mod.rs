//! HTTP executor module
//!
//! Provides the session's throttled request executor.
//!
//! # Features
//!
//! - **Throttling**: single-slot gate with a cooldown after each request
//! - **Guest Credentials**: tokens refreshed transparently before requests
//! - **Response Classification**: 403 bodies decoded, error envelopes parsed
//! - **Rate-Limit Telemetry**: `x-rate-limit-*` headers exposed per response

mod client;
mod rate_limit;
mod throttle;
mod types;

pub use client::{ApiClient, CSRF_COOKIE};
pub use rate_limit::{
    RateLimitSnapshot, RATE_LIMIT_LIMIT, RATE_LIMIT_REMAINING, RATE_LIMIT_RESET,
};
pub use throttle::{Throttle, ThrottlePermit};
pub use types::{ApiError, ApiResponse};

#[cfg(test)]
mod tests;
