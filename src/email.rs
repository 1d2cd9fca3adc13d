//! Email check service.

use log::debug;
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::http::Execute;
use crate::models::EmailCheckResult;
use crate::validation::validate_email;

pub const CHECK_PATH: &str = "/email/check";

/// API response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Default)]
    #[serde(default)]
    pub struct EmailCheck {
        pub email: Option<String>,
        pub domain: String,
        pub is_disposable: bool,
    }
}

/// Checks whether email addresses use disposable domains.
#[derive(Clone)]
pub struct EmailService {
    executor: Arc<dyn Execute>,
}

impl EmailService {
    pub fn new(executor: Arc<dyn Execute>) -> Self {
        Self { executor }
    }

    /// Checks whether an email address uses a disposable domain.
    #[tracing::instrument(skip(self))]
    pub async fn check(&self, email: &str) -> Result<EmailCheckResult> {
        validate_email(email)?;
        let trimmed = email.trim();
        debug!("Checking email {}...", trimmed);

        let response = self
            .executor
            .execute(Method::POST, CHECK_PATH, json!({ "email": trimmed }))
            .await?;
        let data: api::EmailCheck = serde_json::from_value(response.body).map_err(Error::Decode)?;

        Ok(EmailCheckResult {
            email: data.email.unwrap_or_else(|| email.to_string()),
            domain: data.domain,
            is_disposable: data.is_disposable,
        })
    }

    /// Returns true if the email's domain is disposable.
    pub async fn is_disposable(&self, email: &str) -> Result<bool> {
        Ok(self.check(email).await?.is_disposable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, ErrorKind};
    use crate::http::{ApiResponse, MockExecute, RateLimitInfo};
    use mockall::predicate::eq;
    use serde_json::Value;

    fn respond(body: Value) -> Result<ApiResponse> {
        Ok(ApiResponse {
            body,
            rate_limit: RateLimitInfo::default(),
        })
    }

    fn service_returning(request: Value, body: Value) -> EmailService {
        let mut executor = MockExecute::new();
        executor
            .expect_execute()
            .with(eq(Method::POST), eq(CHECK_PATH), eq(request))
            .times(1)
            .returning(move |_, _, _| respond(body.clone()));
        EmailService::new(Arc::new(executor))
    }

    #[tokio::test]
    async fn test_check_returns_result() {
        let service = service_returning(
            json!({"email": "user@tempmail.com"}),
            json!({
                "email": "user@tempmail.com",
                "domain": "tempmail.com",
                "is_disposable": true
            }),
        );

        let result = service.check("user@tempmail.com").await.unwrap();
        assert_eq!(
            result,
            EmailCheckResult {
                email: "user@tempmail.com".to_string(),
                domain: "tempmail.com".to_string(),
                is_disposable: true,
            }
        );
    }

    #[tokio::test]
    async fn test_check_trims_input() {
        let service = service_returning(
            json!({"email": "user@gmail.com"}),
            json!({"email": "user@gmail.com", "domain": "gmail.com", "is_disposable": false}),
        );

        let result = service.check("  user@gmail.com  ").await.unwrap();
        assert_eq!(result.email, "user@gmail.com");
    }

    #[tokio::test]
    async fn test_check_applies_defaults() {
        let service = service_returning(json!({"email": "x@y.io"}), json!({}));

        let result = service.check("x@y.io").await.unwrap();
        assert_eq!(result.email, "x@y.io");
        assert_eq!(result.domain, "");
        assert!(!result.is_disposable);
    }

    #[tokio::test]
    async fn test_check_echoes_raw_input_when_email_missing() {
        let service = service_returning(json!({"email": "x@y.io"}), json!({}));

        let result = service.check("  x@y.io ").await.unwrap();
        assert_eq!(result.email, "  x@y.io ");
    }

    #[tokio::test]
    async fn test_is_disposable_true() {
        let service = service_returning(
            json!({"email": "x@disposable.com"}),
            json!({"email": "x@disposable.com", "domain": "disposable.com", "is_disposable": true}),
        );
        assert!(service.is_disposable("x@disposable.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_disposable_false() {
        let service = service_returning(
            json!({"email": "user@gmail.com"}),
            json!({"email": "user@gmail.com", "domain": "gmail.com", "is_disposable": false}),
        );
        assert!(!service.is_disposable("user@gmail.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_disposable_calls_check_each_time() {
        let mut executor = MockExecute::new();
        executor
            .expect_execute()
            .times(2)
            .returning(|_, _, _| respond(json!({"is_disposable": true})));
        let service = EmailService::new(Arc::new(executor));

        assert!(service.is_disposable("a@b.co").await.unwrap());
        assert!(service.is_disposable("a@b.co").await.unwrap());
    }

    #[tokio::test]
    async fn test_check_invalid_email_skips_network() {
        let mut executor = MockExecute::new();
        executor.expect_execute().never();
        let service = EmailService::new(Arc::new(executor));

        for input in ["not-an-email", "", "missing-at.com", "a@b"] {
            let err = service.check(input).await.unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::Validation));
            assert_eq!(err.status_code(), 422);
        }
    }

    #[tokio::test]
    async fn test_check_propagates_api_error() {
        let mut executor = MockExecute::new();
        executor.expect_execute().returning(|_, _, _| {
            Err(ApiError::from_response(401, json!({"detail": "Invalid API key"})).into())
        });
        let service = EmailService::new(Arc::new(executor));

        let err = service.check("user@gmail.com").await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Authentication));
        assert_eq!(err.as_api().unwrap().message, "Invalid API key");
    }

    #[tokio::test]
    async fn test_check_non_object_body_is_decode_error() {
        let service = service_returning(json!({"email": "a@b.co"}), json!("not an object"));

        let err = service.check("a@b.co").await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
