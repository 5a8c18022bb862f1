//! Error types for birdsearch
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Errors fall into a handful of kinds (see [`ErrorKind`]) so callers can
//! branch on them without matching every variant.

use thiserror::Error;

/// The main error type for birdsearch
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Upstream API Errors
    // ============================================================================
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    // ============================================================================
    // Credential Errors
    // ============================================================================
    #[error("Guest token request failed with status {status}: {body}")]
    GuestTokenRequest { status: u16, body: String },

    #[error("Malformed guest token response: {message}")]
    MalformedGuestTokenResponse { message: String },

    // ============================================================================
    // Session Errors
    // ============================================================================
    #[error("Authorization required: {capability} needs a logged-in session")]
    AuthorizationRequired { capability: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, unexpected status without an error envelope, or a
    /// body that could not be decoded
    Transport,
    /// Structured error envelope returned by the upstream service
    UpstreamApi,
    /// Guest token issuance failed
    Credential,
    /// The operation needs a logged-in session
    AuthorizationRequired,
    /// Invalid configuration
    Config,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an upstream API error
    pub fn api(code: i64, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed guest token response error
    pub fn malformed_guest_token(message: impl Into<String>) -> Self {
        Self::MalformedGuestTokenResponse {
            message: message.into(),
        }
    }

    /// Create an authorization required error
    pub fn authorization_required(capability: impl Into<String>) -> Self {
        Self::AuthorizationRequired {
            capability: capability.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Http(_) | Error::HttpStatus { .. } | Error::JsonParse(_) | Error::InvalidUrl(_) => {
                ErrorKind::Transport
            }
            Error::Api { .. } => ErrorKind::UpstreamApi,
            Error::GuestTokenRequest { .. } | Error::MalformedGuestTokenResponse { .. } => {
                ErrorKind::Credential
            }
            Error::AuthorizationRequired { .. } => ErrorKind::AuthorizationRequired,
            Error::Config { .. } => ErrorKind::Config,
        }
    }

    /// Check if this is a transport-level failure
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// Check if this is a structured upstream API error
    pub fn is_api_error(&self) -> bool {
        self.kind() == ErrorKind::UpstreamApi
    }

    /// Check if this is a guest token issuance failure
    pub fn is_credential_error(&self) -> bool {
        self.kind() == ErrorKind::Credential
    }

    /// Upstream error code, if this is an API error
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Error::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type alias for birdsearch
pub type Result<T> = std::result::Result<T, Error>;
