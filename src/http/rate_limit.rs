//! Rate-limit telemetry from response headers
//!
//! Absent or unparsable values read as zero; a bad header never fails the
//! request that carried it.

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::Serialize;
use std::str::FromStr;

/// Header carrying the window's request limit
pub const RATE_LIMIT_LIMIT: &str = "x-rate-limit-limit";
/// Header carrying the calls left in the window
pub const RATE_LIMIT_REMAINING: &str = "x-rate-limit-remaining";
/// Header carrying the window reset as epoch seconds
pub const RATE_LIMIT_RESET: &str = "x-rate-limit-reset";

/// Rate-limit state reported by one response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RateLimitSnapshot {
    /// Requests allowed in the current window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// Window reset time, epoch seconds
    pub reset: i64,
}

impl RateLimitSnapshot {
    /// Read the snapshot from response headers
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: header_or_zero(headers, RATE_LIMIT_LIMIT),
            remaining: header_or_zero(headers, RATE_LIMIT_REMAINING),
            reset: header_or_zero(headers, RATE_LIMIT_RESET),
        }
    }

    /// Reset time as a timestamp, if one was reported
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        if self.reset == 0 {
            return None;
        }
        DateTime::from_timestamp(self.reset, 0)
    }

    /// Check if the window reported a limit and has no calls left
    pub fn is_exhausted(&self) -> bool {
        self.limit > 0 && self.remaining == 0
    }
}

fn header_or_zero<T: FromStr + Default>(headers: &HeaderMap, name: &str) -> T {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod rate_limit_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::header::HeaderValue;
    use test_case::test_case;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_all_headers_present() {
        let map = headers(&[
            ("x-rate-limit-limit", "180"),
            ("x-rate-limit-remaining", "179"),
            ("x-rate-limit-reset", "1700000000"),
        ]);
        assert_eq!(
            RateLimitSnapshot::from_headers(&map),
            RateLimitSnapshot {
                limit: 180,
                remaining: 179,
                reset: 1_700_000_000,
            }
        );
    }

    #[test]
    fn test_header_names_case_insensitive() {
        let mut map = HeaderMap::new();
        map.insert(
            reqwest::header::HeaderName::from_bytes(b"X-Rate-Limit-Limit").unwrap(),
            HeaderValue::from_static("50"),
        );
        assert_eq!(RateLimitSnapshot::from_headers(&map).limit, 50);
    }

    #[test_case(&[] ; "no headers")]
    #[test_case(&[("x-rate-limit-limit", "abc")] ; "non numeric")]
    #[test_case(&[("x-rate-limit-limit", "")] ; "empty value")]
    #[test_case(&[("x-rate-limit-limit", "-5")] ; "negative limit")]
    fn test_bad_or_missing_limit_defaults_to_zero(pairs: &[(&'static str, &'static str)]) {
        let snapshot = RateLimitSnapshot::from_headers(&headers(pairs));
        assert_eq!(snapshot.limit, 0);
    }

    #[test]
    fn test_one_bad_header_keeps_the_others() {
        let map = headers(&[
            ("x-rate-limit-limit", "180"),
            ("x-rate-limit-remaining", "lots"),
            ("x-rate-limit-reset", "1700000000"),
        ]);
        let snapshot = RateLimitSnapshot::from_headers(&map);
        assert_eq!(snapshot.limit, 180);
        assert_eq!(snapshot.remaining, 0);
        assert_eq!(snapshot.reset, 1_700_000_000);
    }

    #[test]
    fn test_reset_at() {
        let snapshot = RateLimitSnapshot {
            reset: 1_700_000_000,
            ..Default::default()
        };
        assert_eq!(snapshot.reset_at().unwrap().timestamp(), 1_700_000_000);
        assert!(RateLimitSnapshot::default().reset_at().is_none());
    }

    #[test]
    fn test_is_exhausted() {
        let exhausted = RateLimitSnapshot {
            limit: 180,
            remaining: 0,
            reset: 0,
        };
        assert!(exhausted.is_exhausted());
        assert!(!RateLimitSnapshot::default().is_exhausted());
    }
}
