//! HTTP client with retry, rate limit capture and error mapping.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;

use super::rate_limit::{RateLimitInfo, RateLimitObserver, retry_after_secs};
use super::retry::{CONNECT_TIMEOUT, RetryPolicy, is_retryable_status, rate_limit_wait, read_timeout};
use super::{ApiResponse, Execute};
use crate::error::{ApiError, Error, Result, RetryMetadata};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("sec4dev-rust/", env!("CARGO_PKG_VERSION"));

/// Settings needed to build an [`HttpClient`].
#[derive(Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub policy: RetryPolicy,
    pub observer: Option<RateLimitObserver>,
}

/// HTTP client executing API calls with retries.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    api_key: HeaderValue,
    policy: RetryPolicy,
    observer: Option<RateLimitObserver>,
}

/// Result of a single attempt.
enum Attempt {
    Success(ApiResponse),
    /// Retry after the delay if attempts remain, otherwise fail with the error.
    Retry(Duration, Error),
    Fail(Error),
}

impl HttpClient {
    /// Builds the underlying reqwest client with the connect and read timeouts.
    pub fn new(settings: HttpSettings) -> Result<Self> {
        let mut api_key = HeaderValue::from_str(&settings.api_key)
            .map_err(|_| ApiError::validation("API key contains invalid characters"))?;
        api_key.set_sensitive(true);

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(read_timeout(settings.timeout))
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::Transport)?;

        Ok(Self {
            client,
            base_url: settings.base_url,
            api_key,
            policy: settings.policy,
            observer: settings.observer,
        })
    }

    async fn attempt(&self, method: &Method, url: &str, body: &Value, attempt: u32) -> Attempt {
        let response = match self.send(method, url, body).await {
            Ok(response) => response,
            Err(e) => return Attempt::Retry(self.policy.backoff(attempt), Error::Transport(e)),
        };

        let status = response.status();
        let headers = response.headers().clone();
        let rate_limit = RateLimitInfo::from_headers(&headers);
        self.notify(rate_limit);

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return Attempt::Retry(self.policy.backoff(attempt), Error::Transport(e)),
        };

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after_secs(&headers);
            let body = or_default(
                decode_lenient(&bytes),
                json!({"detail": "Rate limit exceeded"}),
            );
            let err = ApiError::rate_limited(
                body,
                RetryMetadata {
                    retry_after: retry_after.unwrap_or(0),
                    limit: rate_limit.limit,
                    remaining: rate_limit.remaining,
                },
            );
            return Attempt::Retry(rate_limit_wait(retry_after), err.into());
        }

        if status.as_u16() >= 400 {
            let body = or_default(decode_lenient(&bytes), json!({}));
            let err = Error::from(ApiError::from_response(status.as_u16(), body));
            if is_retryable_status(status) {
                return Attempt::Retry(self.policy.backoff(attempt), err);
            }
            return Attempt::Fail(err);
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(body) => Attempt::Success(ApiResponse { body, rate_limit }),
            Err(e) => Attempt::Fail(Error::Decode(e)),
        }
    }

    async fn send(&self, method: &Method, url: &str, body: &Value) -> reqwest::Result<Response> {
        self.client
            .request(method.clone(), url)
            .header(API_KEY_HEADER, self.api_key.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
    }

    fn notify(&self, info: RateLimitInfo) {
        if let Some(observer) = &self.observer {
            observer(info);
        }
    }
}

#[async_trait]
impl Execute for HttpClient {
    #[tracing::instrument(skip(self, body))]
    async fn execute(&self, method: Method, path: &str, body: Value) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}...", method, url);

        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;
        loop {
            match self.attempt(&method, &url, &body, attempt).await {
                Attempt::Success(response) => return Ok(response),
                Attempt::Fail(e) => {
                    debug!("{} {}: non-retryable error: {}", method, url, e);
                    return Err(e);
                }
                Attempt::Retry(delay, e) => {
                    if !self.policy.has_attempts_left(attempt) {
                        debug!(
                            "{} {}: giving up after {} attempts: {}",
                            method, url, max_attempts, e
                        );
                        return Err(e);
                    }
                    warn!(
                        "{} {}: attempt {}/{} failed ({}), retrying in {}ms...",
                        method,
                        url,
                        attempt + 1,
                        max_attempts,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Decodes a body as JSON, falling back to the raw text.
fn decode_lenient(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Replaces an empty or falsy body with `default`.
fn or_default(body: Value, default: Value) -> Value {
    let empty = match &body {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    };
    if empty { default } else { body }
}
