//! Request execution: transport, retries, rate limit capture and error mapping.

mod client;
mod rate_limit;
mod retry;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::Result;

pub use client::{API_KEY_HEADER, HttpClient, HttpSettings, USER_AGENT};
pub use rate_limit::{RateLimitInfo, RateLimitObserver, retry_after_secs};
pub use retry::{
    CONNECT_TIMEOUT, DEFAULT_RATE_LIMIT_WAIT, READ_TIMEOUT, RetryPolicy, is_retryable_status,
    rate_limit_wait, read_timeout,
};

/// Decoded success body and the rate limit snapshot of the response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub body: Value,
    pub rate_limit: RateLimitInfo,
}

/// Executes one logical API call, including all retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Execute: Send + Sync {
    /// Sends `body` as JSON to `path` (relative to the base URL).
    async fn execute(&self, method: Method, path: &str, body: Value) -> Result<ApiResponse>;
}
