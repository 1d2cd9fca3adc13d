//! Rate limit snapshots parsed from response headers.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Serialize;
use std::sync::Arc;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Quota state reported by the API on every response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RateLimitInfo {
    pub limit: u64,
    pub remaining: u64,
    pub reset_seconds: u64,
}

impl RateLimitInfo {
    /// Parses the `X-RateLimit-*` headers. Missing or unparsable values are 0.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: header_u64(headers, LIMIT_HEADER).unwrap_or(0),
            remaining: header_u64(headers, REMAINING_HEADER).unwrap_or(0),
            reset_seconds: header_u64(headers, RESET_HEADER).unwrap_or(0),
        }
    }
}

/// Callback invoked synchronously with the snapshot of every received response.
///
/// It runs inside the retry loop on the calling task, so it must not block or
/// do long work. A panic inside it is not caught.
pub type RateLimitObserver = Arc<dyn Fn(RateLimitInfo) + Send + Sync>;

/// Parses the `Retry-After` header as whole seconds.
pub fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    header_u64(headers, RETRY_AFTER.as_str())
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}
