//! Client facade for the Security Checks API.

use log::debug;
use std::sync::{Arc, Mutex};

use crate::config::ClientConfig;
use crate::email::EmailService;
use crate::error::Result;
use crate::http::{HttpClient, HttpSettings, RateLimitInfo, RateLimitObserver};
use crate::ip::IpService;

/// Main client, exposing the email and IP services.
///
/// Both services share one HTTP client and one rate limit observer that records
/// the latest snapshot before forwarding it to the configured callback.
#[derive(Clone)]
pub struct Sec4DevClient {
    config: ClientConfig,
    email: EmailService,
    ip: IpService,
    rate_limit: Arc<Mutex<RateLimitInfo>>,
}

impl Sec4DevClient {
    /// Validates the API key and builds the services.
    #[tracing::instrument(skip(config))]
    pub fn new(config: ClientConfig) -> Result<Self> {
        let config = config.normalized()?;
        debug!("Creating client for {}...", config.base_url());

        let rate_limit = Arc::new(Mutex::new(RateLimitInfo::default()));
        let observer = capture_rate_limit(rate_limit.clone(), config.rate_limit_observer().cloned());

        let http_client = Arc::new(HttpClient::new(HttpSettings {
            base_url: config.base_url().to_string(),
            api_key: config.api_key().to_string(),
            timeout: config.timeout(),
            policy: config.retry_policy(),
            observer: Some(observer),
        })?);

        Ok(Self {
            email: EmailService::new(http_client.clone()),
            ip: IpService::new(http_client),
            config,
            rate_limit,
        })
    }

    /// Creates a client with default settings.
    pub fn from_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new(api_key))
    }

    pub fn email(&self) -> &EmailService {
        &self.email
    }

    pub fn ip(&self) -> &IpService {
        &self.ip
    }

    /// Normalized configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Last rate limit snapshot, all zeros before the first response.
    pub fn rate_limit(&self) -> RateLimitInfo {
        *self
            .rate_limit
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Observer that overwrites `slot` and then forwards to `forward`.
fn capture_rate_limit(
    slot: Arc<Mutex<RateLimitInfo>>,
    forward: Option<RateLimitObserver>,
) -> RateLimitObserver {
    Arc::new(move |info| {
        *slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = info;
        if let Some(forward) = &forward {
            forward(info);
        }
    })
}
