//! IP classification service.

use log::debug;
use reqwest::Method;
use serde_json::json;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::http::Execute;
use crate::models::{IpCheckResult, IpSignals};
use crate::validation::validate_ip;

pub const CHECK_PATH: &str = "/ip/check";

/// API response types (internal).
mod api {
    use serde::Deserialize;

    use crate::models::{IpGeo, IpNetwork, IpSignals};

    #[derive(Deserialize, Debug, Default)]
    #[serde(default)]
    pub struct IpCheck {
        pub ip: Option<String>,
        pub classification: Option<String>,
        pub confidence: Option<f64>,
        pub signals: Option<IpSignals>,
        pub network: Option<IpNetwork>,
        pub geo: Option<IpGeo>,
    }
}

/// Classifies IP addresses.
#[derive(Clone)]
pub struct IpService {
    executor: Arc<dyn Execute>,
}

impl IpService {
    pub fn new(executor: Arc<dyn Execute>) -> Self {
        Self { executor }
    }

    /// Classifies an IPv4 or IPv6 address.
    #[tracing::instrument(skip(self))]
    pub async fn check(&self, ip: &str) -> Result<IpCheckResult> {
        validate_ip(ip)?;
        let trimmed = ip.trim();
        debug!("Checking IP {}...", trimmed);

        let response = self
            .executor
            .execute(Method::POST, CHECK_PATH, json!({ "ip": trimmed }))
            .await?;
        let data: api::IpCheck = serde_json::from_value(response.body).map_err(Error::Decode)?;

        Ok(IpCheckResult {
            ip: data.ip.unwrap_or_else(|| ip.to_string()),
            classification: data.classification.unwrap_or_else(|| "unknown".to_string()),
            confidence: data.confidence.unwrap_or(0.0),
            signals: data.signals.unwrap_or_default(),
            network: data.network.unwrap_or_default(),
            geo: data.geo.unwrap_or_default(),
        })
    }

    async fn signals(&self, ip: &str) -> Result<IpSignals> {
        Ok(self.check(ip).await?.signals)
    }

    pub async fn is_hosting(&self, ip: &str) -> Result<bool> {
        Ok(self.signals(ip).await?.is_hosting)
    }

    pub async fn is_residential(&self, ip: &str) -> Result<bool> {
        Ok(self.signals(ip).await?.is_residential)
    }

    pub async fn is_mobile(&self, ip: &str) -> Result<bool> {
        Ok(self.signals(ip).await?.is_mobile)
    }

    pub async fn is_vpn(&self, ip: &str) -> Result<bool> {
        Ok(self.signals(ip).await?.is_vpn)
    }

    pub async fn is_tor(&self, ip: &str) -> Result<bool> {
        Ok(self.signals(ip).await?.is_tor)
    }

    pub async fn is_proxy(&self, ip: &str) -> Result<bool> {
        Ok(self.signals(ip).await?.is_proxy)
    }
}
