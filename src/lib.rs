// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # birdsearch
//!
//! Guest-session search client for the adaptive search endpoint.
//!
//! ## Features
//!
//! - **Guest Credentials**: anonymous tokens issued and refreshed on demand
//! - **Throttled Executor**: one request per configured delay, per session
//! - **Rate-Limit Telemetry**: `x-rate-limit-*` headers on every response
//! - **Cursor Pagination**: results as a lazy, cancellable `Stream`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use birdsearch::{Scraper, ScraperConfig, SearchMode, Result};
//! use futures::StreamExt;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ScraperConfig::builder()
//!         .request_delay(Duration::from_secs(2))
//!         .build();
//!     let scraper = Scraper::with_config(config)?.with_search_mode(SearchMode::Latest);
//!     scraper.set_cookies(&[("auth_token", "..."), ("ct0", "...")]);
//!
//!     let mut tweets = scraper.search_tweets("rustlang", 100);
//!     while let Some(tweet) = tweets.next().await {
//!         println!("{}", tweet?.text);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                        Scraper                          │
//! │  search_tweets() / search_profiles() → SearchStream<T>  │
//! └─────────────────────────────────────────────────────────┘
//!                             │
//! ┌───────────────┬───────────┴───────────┬─────────────────┐
//! │  Pagination   │        HTTP           │      Auth       │
//! ├───────────────┼───────────────────────┼─────────────────┤
//! │ Producer task │ Throttle gate         │ Guest token     │
//! │ Cursor guard  │ Bearer/CSRF headers   │ TTL refresh     │
//! │ Cancellation  │ Rate-limit headers    │                 │
//! └───────────────┴───────────────────────┴─────────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Guest credential management
pub mod auth;

/// Throttled HTTP executor
pub mod http;

/// Cursor pagination streams
pub mod pagination;

/// Search parameters and result decoding
pub mod search;

/// Session configuration
pub mod config;

/// Search session facade
pub mod scraper;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};

pub use config::{ScraperConfig, ScraperConfigBuilder};
pub use http::{ApiError, RateLimitSnapshot};
pub use pagination::{paginate, Page, PageFetcher, PaginationConfig, SearchStream, Termination};
pub use scraper::Scraper;
pub use search::{Profile, SearchMode, Tweet};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
