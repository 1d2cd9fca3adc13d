//! Error taxonomy for the Security Checks API.
//!
//! Every failed call resolves to exactly one [`Error`]: a typed [`ApiError`]
//! (local validation or a mapped HTTP status), a transport failure after the
//! retry budget is spent, or a success body that could not be decoded.

use serde_json::Value;
use thiserror::Error;

/// Message used when an error body carries no `detail` field.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Status code reported for client-side validation failures.
pub const VALIDATION_STATUS: u16 = 422;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The remote API never produced a usable response.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// A success response whose body was not the expected JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl Error {
    /// Returns the API error if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Kind of the underlying API error, `None` for transport and decode failures.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.as_api().map(|e| e.kind)
    }

    /// HTTP status of the failure, 0 when no response was involved.
    pub fn status_code(&self) -> u16 {
        self.as_api().map_or(0, |e| e.status_code)
    }
}

/// Closed set of API error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 401 - invalid or missing API key
    Authentication,
    /// 402 - quota exceeded
    PaymentRequired,
    /// 403 - account deactivated
    Forbidden,
    /// 404
    NotFound,
    /// 422 - invalid input, remote or local
    Validation,
    /// 429
    RateLimit,
    /// 5xx
    Server,
    Unknown,
}

impl ErrorKind {
    /// Maps an HTTP status code to its error kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::Authentication,
            402 => ErrorKind::PaymentRequired,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            422 => ErrorKind::Validation,
            429 => ErrorKind::RateLimit,
            s if s >= 500 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Authentication => "authentication",
            ErrorKind::PaymentRequired => "payment required",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not found",
            ErrorKind::Validation => "validation",
            ErrorKind::RateLimit => "rate limit",
            ErrorKind::Server => "server",
            ErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Retry metadata attached to rate limit errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryMetadata {
    /// Seconds from the `Retry-After` header, 0 if absent or unparsable.
    pub retry_after: u64,
    pub limit: u64,
    pub remaining: u64,
}

/// An error reported by the API, or a local validation failure shaped like one.
#[derive(Debug, Clone, Error)]
#[error("{kind} error ({status_code}): {message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    /// 0 if the request never reached the network.
    pub status_code: u16,
    /// Decoded JSON body, or the raw text as a JSON string.
    pub response_body: Option<Value>,
    /// Present only for [`ErrorKind::RateLimit`].
    pub rate_limit: Option<RetryMetadata>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code,
            response_body: None,
            rate_limit: None,
        }
    }

    /// A local validation failure, reported with status 422.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message, VALIDATION_STATUS)
    }

    /// Builds the error for a non-success response. The message comes from the
    /// body's `detail` field.
    pub fn from_response(status_code: u16, body: Value) -> Self {
        Self {
            kind: ErrorKind::from_status(status_code),
            message: detail_message(&body),
            status_code,
            response_body: Some(body),
            rate_limit: None,
        }
    }

    /// Builds a 429 error carrying the parsed retry metadata.
    pub fn rate_limited(body: Value, metadata: RetryMetadata) -> Self {
        Self {
            rate_limit: Some(metadata),
            ..Self::from_response(429, body)
        }
    }

    /// Seconds the server asked to wait, for rate limit errors.
    pub fn retry_after(&self) -> Option<u64> {
        self.rate_limit.map(|m| m.retry_after)
    }
}

/// Extracts the `detail` field of an error body, stringifying non-string values.
pub fn detail_message(body: &Value) -> String {
    match body.get("detail") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => UNKNOWN_ERROR_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_status_known_codes() {
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Authentication);
        assert_eq!(ErrorKind::from_status(402), ErrorKind::PaymentRequired);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::Forbidden);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(422), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(429), ErrorKind::RateLimit);
    }

    #[test]
    fn test_from_status_server_range() {
        for status in [500, 502, 503, 504, 599] {
            assert_eq!(ErrorKind::from_status(status), ErrorKind::Server);
        }
    }

    #[test]
    fn test_from_status_other_client_errors_are_unknown() {
        assert_eq!(ErrorKind::from_status(400), ErrorKind::Unknown);
        assert_eq!(ErrorKind::from_status(409), ErrorKind::Unknown);
        assert_eq!(ErrorKind::from_status(418), ErrorKind::Unknown);
    }

    #[test]
    fn test_detail_message_string() {
        let body = json!({"detail": "Invalid API key"});
        assert_eq!(detail_message(&body), "Invalid API key");
    }

    #[test]
    fn test_detail_message_non_string_is_stringified() {
        let body = json!({"detail": [{"loc": ["body", "ip"], "msg": "bad"}]});
        assert_eq!(
            detail_message(&body),
            r#"[{"loc":["body","ip"],"msg":"bad"}]"#
        );
    }

    #[test]
    fn test_detail_message_missing() {
        assert_eq!(detail_message(&json!({})), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(detail_message(&json!("plain text")), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(detail_message(&json!([1, 2])), UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn test_from_response_keeps_body() {
        let err = ApiError::from_response(402, json!({"detail": "Quota exceeded"}));
        assert_eq!(err.kind, ErrorKind::PaymentRequired);
        assert_eq!(err.message, "Quota exceeded");
        assert_eq!(err.status_code, 402);
        assert_eq!(err.response_body, Some(json!({"detail": "Quota exceeded"})));
        assert!(err.rate_limit.is_none());
    }

    #[test]
    fn test_rate_limited_carries_metadata() {
        let err = ApiError::rate_limited(
            json!({"detail": "Slow down"}),
            RetryMetadata {
                retry_after: 5,
                limit: 100,
                remaining: 0,
            },
        );
        assert_eq!(err.kind, ErrorKind::RateLimit);
        assert_eq!(err.status_code, 429);
        assert_eq!(err.retry_after(), Some(5));
        assert_eq!(err.rate_limit.unwrap().limit, 100);
    }

    #[test]
    fn test_validation_error_status() {
        let err = Error::from(ApiError::validation("Invalid email format"));
        assert_eq!(err.kind(), Some(ErrorKind::Validation));
        assert_eq!(err.status_code(), 422);
        assert!(err.to_string().contains("Invalid email format"));
    }
}
