//! Guest credential module
//!
//! The upstream service hands out short-lived anonymous "guest" tokens.
//! `GuestCredentials` owns the current token and refreshes it once it is
//! older than the configured TTL, so callers never see an expired token.

mod credentials;
mod types;

pub use credentials::GuestCredentials;
pub use types::{GuestToken, DEFAULT_GUEST_TOKEN_TTL};
