use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Best-guess category of an IP address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IpClassification {
    Hosting,
    Residential,
    Mobile,
    Vpn,
    Tor,
    Proxy,
    Unknown,
}

impl IpClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            IpClassification::Hosting => "hosting",
            IpClassification::Residential => "residential",
            IpClassification::Mobile => "mobile",
            IpClassification::Vpn => "vpn",
            IpClassification::Tor => "tor",
            IpClassification::Proxy => "proxy",
            IpClassification::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IpClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IpClassification {
    type Err = std::convert::Infallible;

    /// Unrecognized values map to [`IpClassification::Unknown`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "hosting" => IpClassification::Hosting,
            "residential" => IpClassification::Residential,
            "mobile" => IpClassification::Mobile,
            "vpn" => IpClassification::Vpn,
            "tor" => IpClassification::Tor,
            "proxy" => IpClassification::Proxy,
            _ => IpClassification::Unknown,
        })
    }
}

/// Independent indicators; several may be set at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IpSignals {
    pub is_hosting: bool,
    pub is_residential: bool,
    pub is_mobile: bool,
    pub is_vpn: bool,
    pub is_tor: bool,
    pub is_proxy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IpNetwork {
    pub asn: Option<u64>,
    pub org: Option<String>,
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IpGeo {
    pub country: Option<String>,
    pub region: Option<String>,
}

/// Result of an IP check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IpCheckResult {
    /// As returned by the API, or the caller's argument unchanged if absent.
    pub ip: String,
    /// Raw classification string as returned by the API.
    pub classification: String,
    /// Expected in `[0, 1]`; not enforced.
    pub confidence: f64,
    pub signals: IpSignals,
    pub network: IpNetwork,
    pub geo: IpGeo,
}

impl IpCheckResult {
    /// Parsed form of [`IpCheckResult::classification`].
    pub fn classification_kind(&self) -> IpClassification {
        self.classification
            .parse()
            .unwrap_or(IpClassification::Unknown)
    }
}
