//! Client configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ApiError, Result};
use crate::http::{RateLimitInfo, RateLimitObserver, RetryPolicy};

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.sec4.dev/api/v1";

/// Every API key starts with this prefix.
pub const API_KEY_PREFIX: &str = "sec4_";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Configuration for [`Sec4DevClient`](crate::Sec4DevClient).
///
/// ```
/// use sec4dev::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("sec4_live_key")
///     .with_retries(5)
///     .with_retry_delay(Duration::from_millis(250));
/// assert_eq!(config.retries(), 5);
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
    retries: u32,
    retry_delay: Duration,
    on_rate_limit: Option<RateLimitObserver>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            on_rate_limit: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request timeout.
    ///
    /// Values below one second are used as the read timeout. Any value of one
    /// second or more results in a fixed 30 second read timeout. The connect
    /// timeout is always 10 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of retries after the first attempt.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Base delay for exponential backoff.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Registers a callback receiving the rate limit snapshot of every response.
    ///
    /// The callback runs synchronously inside the request loop and must return
    /// quickly.
    pub fn with_rate_limit_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(RateLimitInfo) + Send + Sync + 'static,
    {
        self.on_rate_limit = Some(Arc::new(observer));
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    pub fn rate_limit_observer(&self) -> Option<&RateLimitObserver> {
        self.on_rate_limit.as_ref()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries,
            retry_delay: self.retry_delay,
        }
    }

    /// Checks the API key and returns the config with the key trimmed and
    /// trailing slashes removed from the base URL.
    pub(crate) fn normalized(mut self) -> Result<Self> {
        let api_key = self.api_key.trim();
        if api_key.is_empty() || !api_key.starts_with(API_KEY_PREFIX) {
            return Err(
                ApiError::validation(format!("API key must start with {API_KEY_PREFIX}")).into(),
            );
        }
        self.api_key = api_key.to_string();
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        Ok(self)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .field("retry_delay", &self.retry_delay)
            .field("on_rate_limit", &self.on_rate_limit.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("sec4_k");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.retries(), 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
        assert!(config.rate_limit_observer().is_none());
    }

    #[test]
    fn test_normalized_trims_key_and_url() {
        let config = ClientConfig::new("  sec4_abc  ")
            .with_base_url("https://custom.example.com/v1//")
            .normalized()
            .unwrap();
        assert_eq!(config.api_key(), "sec4_abc");
        assert_eq!(config.base_url(), "https://custom.example.com/v1");
    }

    #[test]
    fn test_normalized_rejects_bad_keys() {
        for key in ["", "   ", "nope", "invalid_key", "SEC4_upper"] {
            let err = ClientConfig::new(key).normalized().unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::Validation));
            assert_eq!(err.status_code(), 422);
            assert!(err.to_string().contains("sec4_"));
        }
    }

    #[test]
    fn test_retry_policy() {
        let policy = ClientConfig::new("sec4_k")
            .with_retries(0)
            .with_retry_delay(Duration::from_millis(10))
            .retry_policy();
        assert_eq!(policy.retries, 0);
        assert_eq!(policy.retry_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let debug = format!("{:?}", ClientConfig::new("sec4_secret"));
        assert!(!debug.contains("sec4_secret"));
        assert!(debug.contains("redacted"));
    }
}
