//! Retry policy: which responses are retried and how long to wait between attempts.

use rand::Rng;
use reqwest::StatusCode;
use std::time::Duration;

/// Fixed connection-establishment timeout.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read timeout used whenever the configured timeout is at least one second.
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Wait applied after a 429 without a usable `Retry-After` header.
pub const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// Upper bound of the random jitter added to exponential backoff.
pub const MAX_JITTER_MS: u64 = 100;

/// Number of retries and base delay for exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first one.
    pub retries: u32,
    /// Base delay, doubled on every attempt.
    pub retry_delay: Duration,
}

impl RetryPolicy {
    /// Total number of attempts, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Whether another attempt may follow attempt index `attempt` (0-based).
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.retries
    }

    /// Exponential backoff for attempt index `attempt`, without jitter.
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.retry_delay.saturating_mul(factor)
    }

    /// Exponential backoff plus 0..=100ms of jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let jitter = rand::thread_rng().gen_range(0..=MAX_JITTER_MS);
        self.base_backoff(attempt)
            .saturating_add(Duration::from_millis(jitter))
    }
}

/// Statuses worth another attempt. 429 is retried with its own flat wait.
pub fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Flat wait before retrying a 429: the server's `Retry-After`, or 60 seconds.
pub fn rate_limit_wait(retry_after: Option<u64>) -> Duration {
    retry_after
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RATE_LIMIT_WAIT)
}

/// Read timeout for a configured request timeout.
///
/// Any configured value of one second or more is replaced by [`READ_TIMEOUT`];
/// only sub-second values are used as given.
pub fn read_timeout(configured: Duration) -> Duration {
    if configured >= Duration::from_secs(1) {
        READ_TIMEOUT
    } else {
        configured
    }
}
